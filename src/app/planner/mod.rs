// Segmentation planner - Turns trim/divide requests into sequenced export jobs

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::app::job_runner::{JobHandle, JobRunner};
use crate::domain::errors::ExportResult;
use crate::domain::model::*;
use crate::domain::rules::{OutputNaming, RangeRules};
use crate::ports::CompletionSink;

/// Policy layer between a caller's request and the job runner
pub struct SegmentationPlanner {
    config: ExportConfiguration,
    policy: DividePolicy,
    next_id: AtomicU64,
}

impl SegmentationPlanner {
    pub fn new(config: ExportConfiguration, policy: DividePolicy) -> Self {
        Self {
            config,
            policy,
            next_id: AtomicU64::new(1),
        }
    }

    /// Build the ordered job list for a request without submitting anything
    pub fn plan(
        &self,
        clip: &SourceClip,
        request: SegmentationRequest,
    ) -> ExportResult<Vec<ExportJob>> {
        let jobs = match request {
            SegmentationRequest::Trim { start, end } => {
                let range = RangeRules::trim_range(clip, start, end)?;
                // The output replaces the source, so it keeps the source's container
                let container = clip
                    .path()
                    .extension()
                    .map(|ext| ext.to_string_lossy().to_lowercase())
                    .unwrap_or_else(|| self.config.container.clone());
                vec![self.job(Segment::Trimmed, clip, clip.path().to_path_buf(), range, container)]
            }
            SegmentationRequest::Divide => {
                let (first, second) = RangeRules::divide_ranges(clip)?;
                let (first_out, second_out) =
                    OutputNaming::divide_outputs(clip.path(), &self.config.container)?;
                let container = &self.config.container;
                vec![
                    self.job(Segment::FirstHalf, clip, first_out, first, container.clone()),
                    self.job(Segment::SecondHalf, clip, second_out, second, container.clone()),
                ]
            }
        };

        debug!(jobs = jobs.len(), source = %clip.path().display(), "Planned segmentation");
        Ok(jobs)
    }

    /// Plan and submit; outcomes go to `sink` as each job finishes
    pub fn dispatch(
        &self,
        runner: &JobRunner,
        clip: &SourceClip,
        request: SegmentationRequest,
        sink: Arc<dyn CompletionSink>,
    ) -> ExportResult<Dispatch> {
        let jobs = self.plan(clip, request)?;
        let job_ids: Vec<JobId> = jobs.iter().map(|job| job.id).collect();

        let mut jobs = jobs.into_iter();
        let mut pending: Vec<JobHandle> = Vec::new();
        if let Some(first) = jobs.next() {
            pending.push(runner.submit(first, Arc::clone(&sink)));
        }
        let rest: Vec<ExportJob> = jobs.collect();

        let policy = self.policy;
        let runner = runner.clone();
        let driver = tokio::spawn(async move {
            for job in rest {
                match policy {
                    DividePolicy::Sequential => {
                        for handle in pending.drain(..) {
                            handle.finished().await;
                        }
                    }
                    DividePolicy::FixedDelay(delay) => tokio::time::sleep(delay).await,
                }
                pending.push(runner.submit(job, Arc::clone(&sink)));
            }
            for handle in pending {
                handle.finished().await;
            }
        });

        info!(jobs = job_ids.len(), policy = ?self.policy, "Dispatched segmentation request");
        Ok(Dispatch { job_ids, driver })
    }

    /// Plan and submit, collecting outcomes on a per-request channel
    pub fn run(
        &self,
        runner: &JobRunner,
        clip: &SourceClip,
        request: SegmentationRequest,
    ) -> ExportResult<SegmentationRun> {
        let (tx, rx) = mpsc::unbounded_channel();
        let dispatch = self.dispatch(runner, clip, request, Arc::new(tx))?;
        Ok(SegmentationRun {
            expected: dispatch.job_ids.len(),
            received: 0,
            outcomes: rx,
            dispatch,
        })
    }

    fn job(
        &self,
        segment: Segment,
        clip: &SourceClip,
        output: PathBuf,
        range: TimeRange,
        container: String,
    ) -> ExportJob {
        let id = JobId(self.next_id.fetch_add(1, Ordering::Relaxed));
        ExportJob::new(
            id,
            segment,
            clip.path(),
            output,
            range,
            self.config.composition,
            container,
        )
    }
}

/// Submitted request; the driver owns any not-yet-submitted jobs
pub struct Dispatch {
    pub job_ids: Vec<JobId>,
    driver: JoinHandle<()>,
}

impl Dispatch {
    /// Wait until every job has been submitted and its outcome delivered
    pub async fn join(self) {
        if let Err(err) = self.driver.await {
            tracing::error!("Segmentation driver aborted: {}", err);
        }
    }
}

/// Per-request stream of job outcomes
pub struct SegmentationRun {
    expected: usize,
    received: usize,
    outcomes: mpsc::UnboundedReceiver<JobOutcome>,
    dispatch: Dispatch,
}

impl SegmentationRun {
    /// Number of outcomes this request will produce
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Next outcome in completion order; `None` once all have arrived
    pub async fn next(&mut self) -> Option<JobOutcome> {
        if self.received >= self.expected {
            return None;
        }
        let outcome = self.outcomes.recv().await?;
        self.received += 1;
        Some(outcome)
    }

    /// Wait for every outcome
    pub async fn collect(mut self) -> Vec<JobOutcome> {
        let mut outcomes = Vec::with_capacity(self.expected);
        while let Some(outcome) = self.next().await {
            outcomes.push(outcome);
        }
        self.dispatch.join().await;
        outcomes
    }
}

/// Serializable view of a planned job
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    pub id: JobId,
    pub segment: Segment,
    pub source: PathBuf,
    pub output: PathBuf,
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub composition: Composition,
    pub container: String,
    pub in_place: bool,
}

impl From<&ExportJob> for JobSummary {
    fn from(job: &ExportJob) -> Self {
        Self {
            id: job.id,
            segment: job.segment,
            source: job.source.clone(),
            output: job.output.clone(),
            start_seconds: job.range.start.as_seconds(),
            end_seconds: job.range.end.as_seconds(),
            composition: job.composition,
            container: job.container.clone(),
            in_place: job.is_in_place(),
        }
    }
}
