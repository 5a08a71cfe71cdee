//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the trim command
#[derive(Args, Debug)]
pub struct TrimArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Start time (HH:MM:SS.ms, MM:SS.ms, or seconds)
    #[arg(short, long, allow_hyphen_values = true)]
    pub start: String,

    /// End time (HH:MM:SS.ms, MM:SS.ms, or seconds)
    #[arg(short, long, allow_hyphen_values = true)]
    pub end: String,
}

/// Arguments for the divide command
#[derive(Args, Debug)]
pub struct DivideArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Scheduling of the second half (sequential, fixed-delay)
    #[arg(long)]
    pub policy: Option<String>,

    /// Delay before the second half under fixed-delay scheduling
    #[arg(long)]
    pub delay_ms: Option<u64>,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Input video file path (not opened)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Clip duration in seconds
    #[arg(short, long)]
    pub duration: f64,

    /// Trim start; plans a divide when omitted
    #[arg(short, long, requires = "end", allow_hyphen_values = true)]
    pub start: Option<String>,

    /// Trim end
    #[arg(short, long, requires = "start", allow_hyphen_values = true)]
    pub end: Option<String>,
}
