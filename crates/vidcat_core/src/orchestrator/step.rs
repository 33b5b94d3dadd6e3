//! Pipeline step trait definition.

use super::errors::StepResult;
use super::types::{Context, RunState, StepOutcome};

/// Trait for pipeline steps.
///
/// The pipeline runner calls, in order:
///
/// 1. `validate_input` - preconditions that only need the context
/// 2. `execute` - the work, recorded in `state`
/// 3. `validate_output` - only after `execute` returned `Success`
pub trait PipelineStep: Send + Sync {
    /// Step name, used in logs and error context.
    fn name(&self) -> &str;

    fn validate_input(&self, ctx: &Context) -> StepResult<()>;

    /// Returns `StepOutcome::Skipped` when the step decided not to run.
    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome>;

    fn validate_output(&self, ctx: &Context, state: &RunState) -> StepResult<()>;

    fn description(&self) -> &str {
        self.name()
    }
}
