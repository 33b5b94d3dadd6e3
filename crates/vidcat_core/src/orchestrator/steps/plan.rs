//! Plan step - lays the clips out on the output timeline.

use std::sync::Arc;

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, RunState, StepOutcome};
use crate::timeline::timecode::format_vtt;
use crate::timeline::{build_plan, PlanInput};

/// Builds the concatenation plan from the probed clips.
pub struct PlanStep;

impl PlanStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlanStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for PlanStep {
    fn name(&self) -> &str {
        "Plan"
    }

    fn description(&self) -> &str {
        "Build segments, chapters and description"
    }

    fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        if state.sources.is_empty() {
            return Err(StepError::missing_state("No probed clips to plan"));
        }

        if let Some(directive) = ctx.services.adjuster.directive() {
            ctx.logger.info(&format!("Adjusting timestamps: {}", directive));
        }

        let inputs = state
            .sources
            .iter()
            .map(|source| PlanInput::from_annotation(Arc::clone(source)))
            .collect::<Result<Vec<_>, _>>()?;

        let plan = build_plan(&inputs, &ctx.services.adjuster)?;

        ctx.logger.section("Description");
        for line in &plan.description_lines {
            ctx.logger.info(line);
        }
        ctx.logger.info(&format!(
            "{} segment(s), total duration {}",
            plan.len(),
            format_vtt(plan.total_duration)
        ));

        state.plan = Some(plan);
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        match &state.plan {
            Some(plan) if !plan.is_empty() => Ok(()),
            Some(_) => Err(StepError::invalid_output("Plan has no segments")),
            None => Err(StepError::invalid_output("Plan was not recorded")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaInfo, SourceFile};
    use crate::orchestrator::test_support::test_context;
    use crate::timeline::TimelineError;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn source(name: &str, duration: f64) -> Arc<SourceFile> {
        let end = NaiveDate::from_ymd_opt(2024, 8, 2)
            .unwrap()
            .and_hms_opt(17, 30, 0)
            .unwrap();
        Arc::new(SourceFile::new(name, Arc::new(MediaInfo::new(duration)), end))
    }

    #[test]
    fn builds_plan_from_annotated_sources() {
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path());
        let mut state = RunState::new("test");
        state.sources = vec![source("/v/a.mp4", 20.0), source("/v/b [0-5,10-].mp4", 30.0)];

        PlanStep.execute(&ctx, &mut state).unwrap();
        PlanStep.validate_output(&ctx, &state).unwrap();

        let plan = state.plan.unwrap();
        assert_eq!(plan.len(), 3);
        assert_eq!(plan.total_duration, 45.0);
        assert_eq!(plan.chapters[2].start_ms, 25_000);
    }

    #[test]
    fn malformed_annotation_fails_the_step() {
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path());
        let mut state = RunState::new("test");
        state.sources = vec![source("/v/a [x-5].mp4", 20.0)];

        let err = PlanStep.execute(&ctx, &mut state).unwrap_err();
        assert!(matches!(
            err,
            StepError::Timeline(TimelineError::MalformedSegmentSpec { .. })
        ));
    }

    #[test]
    fn requires_probed_sources() {
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path());
        let err = PlanStep.execute(&ctx, &mut RunState::new("test")).unwrap_err();
        assert!(matches!(err, StepError::MissingState(_)));
    }
}
