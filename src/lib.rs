//! SplitClip Library
//!
//! Trims a clip in place or divides it into two halves by planning
//! time-ranged export jobs and running them through a pluggable export engine.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use app::{JobRunner, SegmentationPlanner, SegmentationRun};
pub use domain::errors::{ExportError, ExportResult};
pub use domain::model::{
    DividePolicy, ExportConfiguration, ExportJob, JobOutcome, JobStatus, MediaTime,
    SegmentationRequest, SourceClip, TimeRange,
};
pub use error::{SplitClipError, SplitClipResult};
