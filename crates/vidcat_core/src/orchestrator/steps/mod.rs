//! Pipeline step implementations, in run order.

mod artifacts;
mod plan;
mod probe;
mod publish;
mod transcode;

pub use artifacts::ArtifactsStep;
pub use plan::PlanStep;
pub use probe::ProbeStep;
pub use publish::PublishStep;
pub use transcode::TranscodeStep;
