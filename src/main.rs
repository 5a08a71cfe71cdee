//! SplitClip
//!
//! Trims a video clip in place or divides it into two halves.
//!
//! # Usage
//!
//! ```bash
//! splitclip trim --input clip.mp4 --start 2 --end 00:07.5
//! splitclip divide --input clip.mp4
//! splitclip plan --input clip.mp4 --duration 10
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;

use splitclip::app::container::{AppContainer, DefaultAppContainer};
use splitclip::cli::{commands, Cli, Commands};
use splitclip::config_initialization::initialize_configuration_hierarchy;
use splitclip::utils::{init_logging, LogFormat};

/// Main entry point for the SplitClip CLI application
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = initialize_configuration_hierarchy(&cli)?;

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_logging(&settings.log_level, format);

    info!("Starting SplitClip");

    let container = DefaultAppContainer::new(&settings)?;
    let interactor = container.segment_interactor();

    match cli.command {
        Commands::Trim(args) => commands::trim(&interactor, args).await?,
        Commands::Divide(args) => commands::divide(&interactor, args).await?,
        Commands::Plan(args) => commands::plan(&interactor, args)?,
    }

    info!("SplitClip completed successfully");
    Ok(())
}
