//! CLI module for SplitClip
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

pub use args::{DivideArgs, PlanArgs, TrimArgs};

/// SplitClip
///
/// Trim a clip in place or divide it into two halves.
#[derive(Parser, Debug)]
#[command(name = "splitclip")]
#[command(about = "SplitClip - Trim and divide video clips")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(long, env = "SPLITCLIP_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Logging level
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Export quality preset (highest-quality, medium, low-quality)
    #[arg(long, global = true)]
    pub preset: Option<String>,

    /// Stream handling for exports (identity copies streams, reencode applies the preset)
    #[arg(long, global = true)]
    pub composition: Option<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Keep only [start, end) of a clip, overwriting it in place
    Trim(args::TrimArgs),
    /// Split a clip at its midpoint into two files
    Divide(args::DivideArgs),
    /// Print the jobs a request would produce, as JSON, without exporting
    Plan(args::PlanArgs),
}
