//! Pipeline orchestrator for processing input directories.
//!
//! # Architecture
//!
//! ```text
//! RunProcessor (one per process, owns RunServices)
//!     └── per directory: Pipeline
//!             ├── Step: Probe      clips -> SourceFiles (cached)
//!             ├── Step: Plan       SourceFiles -> ConcatenationPlan
//!             ├── Step: Artifacts  plan -> concat.txt, meta.txt, times.ass
//!             ├── Step: Transcode  ffmpeg
//!             └── Step: Publish    upload hand-off
//! ```
//!
//! # Example
//!
//! ```ignore
//! use vidcat_core::orchestrator::{AlwaysYes, RunProcessor, RunServices};
//! use vidcat_core::timeline::TimelineAdjuster;
//!
//! let adjuster = TimelineAdjuster::from_setting(settings.timestamps.adjust_date.as_deref())?;
//! let services = RunServices::from_settings(&settings, adjuster, Box::new(AlwaysYes));
//! let results = RunProcessor::new(settings, services).process_all(&dirs, None);
//! ```

mod errors;
mod pipeline;
mod processor;
mod step;
pub mod steps;
mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use errors::{PipelineError, PipelineResult, StepError, StepResult};
pub use pipeline::{CancelHandle, Pipeline, PipelineRunResult};
pub use processor::{DirectoryResult, LogCallbackFactory, RunProcessor};
pub use step::PipelineStep;
pub use steps::{ArtifactsStep, PlanStep, ProbeStep, PublishStep, TranscodeStep};
pub use types::{
    AlwaysNo, AlwaysYes, Context, Prompter, PublishOutput, RunServices, RunState, StepOutcome,
    TranscodeOutput,
};

/// The standard pipeline: Probe, Plan, Artifacts, Transcode, Publish.
pub fn create_standard_pipeline() -> Pipeline {
    Pipeline::new()
        .with_step(ProbeStep::new())
        .with_step(PlanStep::new())
        .with_step(ArtifactsStep::new())
        .with_step(TranscodeStep::new())
        .with_step(PublishStep::new())
}
