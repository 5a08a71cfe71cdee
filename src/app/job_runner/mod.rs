// Job runner - Submits export jobs and reports each outcome exactly once

use std::path::PathBuf;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::domain::errors::{ExportError, ExportResult};
use crate::domain::model::*;
use crate::ports::*;

/// Executes `ExportJob`s against the engine port
#[derive(Clone)]
pub struct JobRunner {
    engine: Arc<dyn ExportEnginePort>,
    fs: Arc<dyn FsPort>,
    config: ExportConfiguration,
}

/// Handle to a submitted job
pub struct JobHandle {
    pub id: JobId,
    task: JoinHandle<JobStatus>,
}

impl JobHandle {
    /// Wait until the job's outcome has been delivered and return its final status
    pub async fn finished(self) -> JobStatus {
        match self.task.await {
            Ok(status) => status,
            Err(err) => {
                error!(job_id = %self.id, "Export task aborted: {}", err);
                JobStatus::Failed(ExportError::engine(format!("export task aborted: {}", err)))
            }
        }
    }
}

impl JobRunner {
    /// Create new job runner with injected ports
    pub fn new(
        engine: Arc<dyn ExportEnginePort>,
        fs: Arc<dyn FsPort>,
        config: ExportConfiguration,
    ) -> Self {
        Self { engine, fs, config }
    }

    /// Start a job without blocking; the outcome goes to `sink`
    pub fn submit(&self, job: ExportJob, sink: Arc<dyn CompletionSink>) -> JobHandle {
        let id = job.id;
        let runner = self.clone();
        info!(job_id = %id, segment = %job.segment, range = %job.range, output = %job.output.display(), "Submitting export job");

        let task = tokio::spawn(async move {
            let (job, outcome) = runner.run(job).await;
            sink.deliver(outcome);
            job.status().clone()
        });

        JobHandle { id, task }
    }

    async fn run(&self, mut job: ExportJob) -> (ExportJob, JobOutcome) {
        let mut cleanup_error = None;

        // The source must be handed off before the shared path is cleared
        let staged = if job.is_in_place() {
            match self.fs.stage_source(&job.source).await {
                Ok(staged) => {
                    debug!(job_id = %job.id, staged = %staged.path.display(), "Staged source for in-place export");
                    Some(staged)
                }
                Err(err) => {
                    error!(job_id = %job.id, "Could not stage source: {}", err);
                    return self.finish(job, Err(err), None);
                }
            }
        } else {
            None
        };

        match self.fs.remove_file(&job.output).await {
            Ok(true) => debug!(job_id = %job.id, "Removed existing output file"),
            Ok(false) => {}
            Err(err) => {
                warn!(job_id = %job.id, "Could not remove file: {}", err);
                cleanup_error = Some(err);
            }
        }

        if let Err(err) = job.mark_running() {
            error!("{}", err);
        }

        let source = staged
            .as_ref()
            .map(|s| s.path.clone())
            .unwrap_or_else(|| job.source.clone());
        let request = EngineRequest::for_job(&job, source, self.config.preset);

        // A panicking engine still has to yield an outcome and settle the staged source
        let engine = Arc::clone(&self.engine);
        let result = match tokio::spawn(async move { engine.export(&request).await }).await {
            Ok(result) => result,
            Err(err) => {
                error!(job_id = %job.id, "Export engine task failed: {}", err);
                Err(ExportError::engine(format!("export engine aborted: {}", err)))
            }
        };

        if let Some(staged) = staged {
            let settled = match &result {
                Ok(_) => self.fs.discard_staged(&staged).await,
                Err(_) => self.fs.restore_source(&staged, &job.source).await,
            };
            if let Err(err) = settled {
                warn!(job_id = %job.id, "Could not settle staged source: {}", err);
                cleanup_error.get_or_insert(err);
            }
        }

        self.finish(job, result, cleanup_error)
    }

    fn finish(
        &self,
        mut job: ExportJob,
        result: ExportResult<PathBuf>,
        cleanup_error: Option<ExportError>,
    ) -> (ExportJob, JobOutcome) {
        let transition = match &result {
            Ok(path) => {
                info!(job_id = %job.id, output = %path.display(), "Export finished");
                job.mark_succeeded(path.clone())
            }
            Err(err) => {
                error!(job_id = %job.id, "Export failed: {}", err);
                job.mark_failed(err.clone())
            }
        };
        if let Err(err) = transition {
            error!("{}", err);
        }

        let outcome = JobOutcome {
            job_id: job.id,
            segment: job.segment,
            range: job.range,
            result,
            cleanup_error,
        };
        (job, outcome)
    }
}
