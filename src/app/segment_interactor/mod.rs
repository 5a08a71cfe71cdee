// Segment interactor - Orchestrates trim and divide requests for a file on disk

use std::path::Path;
use std::sync::Arc;

use crate::app::job_runner::JobRunner;
use crate::app::planner::{JobSummary, SegmentationPlanner, SegmentationRun};
use crate::domain::model::*;
use crate::error::{SplitClipError, SplitClipResult};
use crate::ports::*;

/// Interactor for the trim/divide use cases
pub struct SegmentInteractor {
    probe_port: Arc<dyn ProbePort>,
    fs_port: Arc<dyn FsPort>,
    log_port: Arc<dyn LogPort>,
    planner: SegmentationPlanner,
    runner: JobRunner,
}

impl SegmentInteractor {
    /// Create new segment interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
        planner: SegmentationPlanner,
        runner: JobRunner,
    ) -> Self {
        Self {
            probe_port,
            fs_port,
            log_port,
            planner,
            runner,
        }
    }

    /// Resolve the clip at `path` and read its duration
    pub async fn load_clip(&self, path: &Path) -> SplitClipResult<SourceClip> {
        if !self.fs_port.file_exists(path).await {
            return Err(SplitClipError::InputFileNotFound {
                path: path.display().to_string(),
            });
        }

        self.log_port
            .debug(&format!("Probing {}", path.display()))
            .await;
        let duration = self.probe_port.probe_duration(path).await?;
        self.log_port
            .info(&format!(
                "Loaded clip {} (duration {})",
                path.display(),
                duration
            ))
            .await;

        Ok(SourceClip::new(path, duration)?)
    }

    /// Start a request; outcomes arrive on the returned run as jobs finish
    pub async fn execute(
        &self,
        path: &Path,
        request: SegmentationRequest,
    ) -> SplitClipResult<SegmentationRun> {
        let clip = self.load_clip(path).await?;

        if let SegmentationRequest::Trim { .. } = request {
            self.log_port
                .warn(&format!(
                    "Trim overwrites {} in place; the untrimmed original is not kept",
                    path.display()
                ))
                .await;
        }

        let run = self
            .planner
            .run(&self.runner, &clip, request)
            .map_err(SplitClipError::from);
        match &run {
            Ok(run) => {
                self.log_port
                    .info(&format!("Submitted {} export job(s)", run.expected()))
                    .await
            }
            Err(err) => self.log_port.error(&format!("Request rejected: {}", err)).await,
        }
        run
    }

    /// Plan against a known duration without touching the file system or engine
    pub fn preview(
        &self,
        path: &Path,
        duration: MediaTime,
        request: SegmentationRequest,
    ) -> SplitClipResult<Vec<JobSummary>> {
        let clip = SourceClip::new(path, duration)?;
        let jobs = self.planner.plan(&clip, request)?;
        Ok(jobs.iter().map(JobSummary::from).collect())
    }
}
