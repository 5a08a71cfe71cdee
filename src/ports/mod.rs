// Ports - Interface definitions (contracts)

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::errors::ExportResult;
use crate::domain::model::*;
use crate::error::SplitClipResult;

/// Everything the export engine needs to run one job
#[derive(Debug, Clone, PartialEq)]
pub struct EngineRequest {
    pub job_id: JobId,
    /// Path the engine reads from; a staged copy for in-place jobs
    pub source: PathBuf,
    pub output: PathBuf,
    pub range: TimeRange,
    pub composition: Composition,
    pub container: String,
    pub preset: Preset,
}

impl EngineRequest {
    /// Request for `job`, reading from `source`
    pub fn for_job(job: &ExportJob, source: PathBuf, preset: Preset) -> Self {
        Self {
            job_id: job.id,
            source,
            output: job.output.clone(),
            range: job.range,
            composition: job.composition,
            container: job.container.clone(),
            preset,
        }
    }
}

/// Port for the external transcode capability
///
/// Implementations must tolerate several concurrent requests reading the
/// same source file.
#[async_trait]
pub trait ExportEnginePort: Send + Sync {
    /// Run one export to completion and return the written path
    async fn export(&self, request: &EngineRequest) -> ExportResult<PathBuf>;
}

/// Port for reading clip metadata
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Total duration of the media at `path`
    async fn probe_duration(&self, path: &Path) -> SplitClipResult<MediaTime>;
}

/// A source file moved aside so its original path can be overwritten
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedSource {
    pub path: PathBuf,
}

/// Port for file system operations used around an export
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Check if file exists
    async fn file_exists(&self, path: &Path) -> bool;

    /// Delete a file; `Ok(false)` when there was nothing to delete
    async fn remove_file(&self, path: &Path) -> ExportResult<bool>;

    /// Move the source aside to a unique sibling path
    async fn stage_source(&self, path: &Path) -> ExportResult<StagedSource>;

    /// Move a staged source back to its original path
    async fn restore_source(&self, staged: &StagedSource, original: &Path) -> ExportResult<()>;

    /// Delete a staged source once the export no longer needs it
    async fn discard_staged(&self, staged: &StagedSource) -> ExportResult<()>;
}

/// Port for logging and observability
#[async_trait]
pub trait LogPort: Send + Sync {
    /// Log info message
    async fn info(&self, message: &str);

    /// Log warning message
    async fn warn(&self, message: &str);

    /// Log error message
    async fn error(&self, message: &str);

    /// Log debug message
    async fn debug(&self, message: &str);
}

/// Context on which job outcomes are delivered to the caller
///
/// `deliver` is called exactly once per submitted job, from the runner's task.
pub trait CompletionSink: Send + Sync {
    fn deliver(&self, outcome: JobOutcome);
}

impl CompletionSink for mpsc::UnboundedSender<JobOutcome> {
    fn deliver(&self, outcome: JobOutcome) {
        if let Err(err) = self.send(outcome) {
            tracing::debug!(job_id = %err.0.job_id, "Outcome receiver dropped");
        }
    }
}

/// Adapts a closure into a completion sink
pub struct FnSink<F>(pub F);

impl<F> CompletionSink for FnSink<F>
where
    F: Fn(JobOutcome) + Send + Sync,
{
    fn deliver(&self, outcome: JobOutcome) {
        (self.0)(outcome)
    }
}
