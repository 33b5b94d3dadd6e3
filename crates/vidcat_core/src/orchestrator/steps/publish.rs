//! Publish step - hands the finished video to the uploader.

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, PublishOutput, RunState, StepOutcome};
use crate::publish::UploadRequest;

pub struct PublishStep;

impl PublishStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PublishStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for PublishStep {
    fn name(&self) -> &str {
        "Publish"
    }

    fn description(&self) -> &str {
        "Hand the output to the uploader"
    }

    fn validate_input(&self, _ctx: &Context) -> StepResult<()> {
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let output = &ctx.output_path;
        if !output.exists() {
            return Err(StepError::missing_state(format!(
                "Nothing to publish, {} does not exist",
                output.display()
            )));
        }

        if !ctx.settings.publish.auto_upload && !ctx.services.prompter.confirm_upload(output) {
            return Ok(StepOutcome::Skipped("upload declined".to_string()));
        }

        let description = state
            .plan
            .as_ref()
            .map(|plan| plan.description())
            .unwrap_or_default();

        let request = UploadRequest {
            video_path: output.clone(),
            title: ctx.job.name.clone(),
            description,
            thumbnail: ctx.job.thumbnail.clone(),
        };

        let uploader = &ctx.services.uploader;
        ctx.logger
            .info(&format!("Publishing '{}' via {}", request.title, uploader.name()));
        let receipt = uploader
            .upload(&request)
            .map_err(|e| StepError::io_error(format!("{} upload", uploader.name()), e))?;

        state.publish = Some(PublishOutput {
            uploader: uploader.name().to_string(),
            artifacts: receipt.artifacts,
        });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, _ctx: &Context, state: &RunState) -> StepResult<()> {
        if state.publish.is_none() {
            return Err(StepError::invalid_output("Publish result was not recorded"));
        }
        Ok(())
    }
}
