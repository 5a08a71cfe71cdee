use std::sync::Arc;

use crate::adapters::{FFmpegExportAdapter, LocalFsAdapter, Settings, TracingLogAdapter};
use crate::app::job_runner::JobRunner;
use crate::app::planner::SegmentationPlanner;
use crate::app::segment_interactor::SegmentInteractor;
use crate::error::SplitClipResult;
use crate::ports::{ExportEnginePort, FsPort, LogPort, ProbePort};

pub trait AppContainer: Send + Sync {
    fn segment_interactor(&self) -> Arc<SegmentInteractor>;
}

pub struct DefaultAppContainer {
    segment_interactor: Arc<SegmentInteractor>,
}

impl DefaultAppContainer {
    /// Wire the production adapters from settings
    pub fn new(settings: &Settings) -> SplitClipResult<Self> {
        let export = settings.export_configuration()?;
        let policy = settings.divide_policy()?;

        let engine = Arc::new(FFmpegExportAdapter::new(&settings.ffmpeg_path));
        let probe = Self::probe_port(settings)?;
        let fs = Arc::new(LocalFsAdapter::new());
        let log = Arc::new(TracingLogAdapter::new("segment"));

        let runner = JobRunner::new(
            engine as Arc<dyn ExportEnginePort>,
            Arc::clone(&fs) as Arc<dyn FsPort>,
            export.clone(),
        );
        let planner = SegmentationPlanner::new(export, policy);

        let segment_interactor = Arc::new(SegmentInteractor::new(
            probe,
            fs as Arc<dyn FsPort>,
            log as Arc<dyn LogPort>,
            planner,
            runner,
        ));

        Ok(Self { segment_interactor })
    }

    #[cfg(not(feature = "libav"))]
    fn probe_port(settings: &Settings) -> SplitClipResult<Arc<dyn ProbePort>> {
        Ok(Arc::new(crate::adapters::FFprobeAdapter::new(&settings.ffprobe_path)))
    }

    #[cfg(feature = "libav")]
    fn probe_port(_settings: &Settings) -> SplitClipResult<Arc<dyn ProbePort>> {
        Ok(Arc::new(crate::adapters::ProbeLibavAdapter::new()?))
    }
}

impl AppContainer for DefaultAppContainer {
    fn segment_interactor(&self) -> Arc<SegmentInteractor> {
        Arc::clone(&self.segment_interactor)
    }
}
