#![forbid(unsafe_code)]

pub mod config;
pub mod domain;
pub mod error;
pub mod job;
pub mod merge;
pub mod mime;
pub mod plan;
pub mod stats;

pub mod util {
    pub mod size;
}

// Re-exports: stable API surface
pub use domain::{RemoteFile, SegmentChunk};
pub use error::{Result, SegdlError};
pub use job::{DownloadJob, JobState};
pub use merge::{merge, remove_sinks, sink_path};
pub use plan::{SegmentPlan, plan, plan_all, recommended_segments};
pub use stats::Completion;
