//! Artifacts step - writes the concat list, metadata and overlay track.

use crate::artifacts::write_artifacts;
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, RunState, StepOutcome};

pub struct ArtifactsStep;

impl ArtifactsStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ArtifactsStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ArtifactsStep {
    fn name(&self) -> &str {
        "Artifacts"
    }

    fn description(&self) -> &str {
        "Write transcoder input files"
    }

    fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let plan = state
            .plan
            .as_ref()
            .ok_or_else(|| StepError::missing_state("No plan to write"))?;

        let overlay = ctx.settings.timestamps.overlay;
        let paths = write_artifacts(plan, &ctx.work_dir, overlay)
            .map_err(|e| StepError::io_error("writing transcoder artifacts", e))?;

        ctx.logger.info(&format!("Concat list: {}", paths.concat_list.display()));
        ctx.logger.info(&format!("Chapters: {}", paths.metadata.display()));
        if let Some(ref track) = paths.overlay_track {
            ctx.logger
                .info(&format!("Overlay track ({}): {}", overlay, track.display()));
        }

        state.artifacts = Some(paths);
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        let paths = state
            .artifacts
            .as_ref()
            .ok_or_else(|| StepError::invalid_output("Artifact paths were not recorded"))?;

        let mut expected = vec![&paths.concat_list, &paths.metadata];
        expected.extend(paths.overlay_track.as_ref());
        for path in expected {
            if !path.exists() {
                return Err(StepError::invalid_output(format!(
                    "Missing artifact: {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}
