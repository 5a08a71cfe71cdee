//! Command implementations

use anyhow::{Context, Result};
use tracing::info;

use crate::app::{SegmentInteractor, SegmentationRun};
use crate::cli::args::{DivideArgs, PlanArgs, TrimArgs};
use crate::domain::model::{MediaTime, SegmentationRequest};
use crate::utils::TimeParser;

/// Execute the trim command
pub async fn trim(interactor: &SegmentInteractor, args: TrimArgs) -> Result<()> {
    let request = parse_trim(&args.start, &args.end)?;
    info!(input = %args.input.display(), "Starting trim");

    let run = interactor.execute(&args.input, request).await?;
    report(run).await
}

/// Execute the divide command
pub async fn divide(interactor: &SegmentInteractor, args: DivideArgs) -> Result<()> {
    info!(input = %args.input.display(), "Starting divide");

    let run = interactor
        .execute(&args.input, SegmentationRequest::Divide)
        .await?;
    report(run).await
}

/// Execute the plan command
pub fn plan(interactor: &SegmentInteractor, args: PlanArgs) -> Result<()> {
    let duration = MediaTime::from_seconds(args.duration)
        .with_context(|| format!("Invalid duration: {}", args.duration))?;

    let request = match (&args.start, &args.end) {
        (Some(start), Some(end)) => parse_trim(start, end)?,
        _ => SegmentationRequest::Divide,
    };

    let jobs = interactor.preview(&args.input, duration, request)?;
    println!("{}", serde_json::to_string_pretty(&jobs)?);
    Ok(())
}

fn parse_trim(start: &str, end: &str) -> Result<SegmentationRequest> {
    let parser = TimeParser::new();
    let start = parser
        .parse_time(start)
        .with_context(|| format!("Invalid start time '{}'", start))?;
    let end = parser
        .parse_time(end)
        .with_context(|| format!("Invalid end time '{}'", end))?;
    Ok(SegmentationRequest::trim_seconds(start, end)?)
}

/// Print each outcome as it arrives; fails if any job failed
async fn report(mut run: SegmentationRun) -> Result<()> {
    let expected = run.expected();
    let mut failures = 0;

    while let Some(outcome) = run.next().await {
        match &outcome.result {
            Ok(path) => println!("{} {} {}", outcome.segment, outcome.range, path.display()),
            Err(err) => {
                failures += 1;
                eprintln!("{} {} failed: {}", outcome.segment, outcome.range, err);
            }
        }
        if let Some(warning) = &outcome.cleanup_error {
            eprintln!("warning: {}", warning);
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} export job(s) failed", failures, expected);
    }
    Ok(())
}
