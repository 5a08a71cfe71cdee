// Application layer - Job execution, planning and use case interactors

pub mod container;
pub mod job_runner;
pub mod planner;
pub mod segment_interactor;

// Re-export the main entry points
pub use job_runner::{JobHandle, JobRunner};
pub use planner::{Dispatch, JobSummary, SegmentationPlanner, SegmentationRun};
pub use segment_interactor::SegmentInteractor;
