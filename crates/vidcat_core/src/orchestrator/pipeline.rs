//! Sequential step runner.
//!
//! Each step goes through `validate_input`, `execute` and, unless it was
//! skipped, `validate_output`. The first error ends the run. A shared
//! [`CancelHandle`] is polled before every step.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::errors::{PipelineError, PipelineResult, StepResult};
use super::step::PipelineStep;
use super::types::{Context, RunState, StepOutcome};

pub struct Pipeline {
    steps: Vec<Box<dyn PipelineStep>>,
    cancel: CancelHandle,
}

impl Pipeline {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            cancel: CancelHandle::default(),
        }
    }

    pub fn with_step<S: PipelineStep + 'static>(mut self, step: S) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    /// Poll an outside handle (e.g. the one given to `process_all`).
    pub fn with_cancel_handle(mut self, handle: CancelHandle) -> Self {
        self.cancel = handle;
        self
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    /// Run all steps for one directory.
    pub fn run(&self, ctx: &Context, state: &mut RunState) -> PipelineResult<PipelineRunResult> {
        let mut summary = PipelineRunResult::default();

        for step in &self.steps {
            let name = step.name();
            if self.is_cancelled() {
                ctx.logger.warn(&format!("Cancelled before {}", name));
                return Err(PipelineError::cancelled(ctx.run_name()));
            }

            ctx.logger.phase(name);
            match run_step(step.as_ref(), ctx, state) {
                Ok(StepOutcome::Success) => {
                    ctx.logger.success(&format!("{} done", name));
                    summary.steps_completed.push(name.to_string());
                }
                Ok(StepOutcome::Skipped(reason)) => {
                    ctx.logger.info(&format!("{} skipped: {}", name, reason));
                    summary.steps_skipped.push(name.to_string());
                }
                Err(e) => {
                    ctx.logger.error(&format!("{} failed: {}", name, e));
                    return Err(PipelineError::step_failed(ctx.run_name(), name, e));
                }
            }
        }

        Ok(summary)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

fn run_step(step: &dyn PipelineStep, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
    ctx.logger.debug(&format!("{}: checking input", step.name()));
    step.validate_input(ctx)?;

    let outcome = step.execute(ctx, state)?;
    if outcome == StepOutcome::Success {
        step.validate_output(ctx, state)?;
    }
    Ok(outcome)
}

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Step names by outcome, in run order.
#[derive(Debug, Clone, Default)]
pub struct PipelineRunResult {
    pub steps_completed: Vec<String>,
    pub steps_skipped: Vec<String>,
}
