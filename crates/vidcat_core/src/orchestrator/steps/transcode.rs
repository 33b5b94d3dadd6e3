//! Transcode step - runs ffmpeg over the concat list.

use std::fs;
use std::path::Path;

use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, RunState, StepOutcome, TranscodeOutput};
use crate::transcode::{build_transcode_args, format_tokens_pretty, run_transcoder};

pub struct TranscodeStep;

impl TranscodeStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TranscodeStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for TranscodeStep {
    fn name(&self) -> &str {
        "Transcode"
    }

    fn description(&self) -> &str {
        "Concatenate and encode with ffmpeg"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if ctx.settings.tools.ffmpeg.trim().is_empty() {
            return Err(StepError::invalid_input("No ffmpeg binary configured"));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let artifacts = state
            .artifacts
            .as_ref()
            .ok_or_else(|| StepError::missing_state("Artifacts were not written"))?;
        let output = &ctx.output_path;

        if output.exists() {
            if !ctx.services.prompter.confirm_overwrite(output) {
                state.transcode = Some(TranscodeOutput {
                    output_path: output.clone(),
                    exit_code: None,
                    command: String::new(),
                });
                return Ok(StepOutcome::Skipped(format!(
                    "keeping existing {}",
                    output.display()
                )));
            }
        }

        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| StepError::io_error("creating output directory", e))?;
        }

        let tokens = build_transcode_args(
            &ctx.settings.encode,
            ctx.settings.timestamps.overlay,
            artifacts,
            output,
        )
        .into_tokens();

        let ffmpeg = &ctx.settings.tools.ffmpeg;
        let command = format!("{} {}", ffmpeg, tokens.join(" "));
        ctx.logger.command(&command);
        if ctx.settings.logging.show_args_pretty {
            ctx.logger.log_transcoder_args_pretty(&format_tokens_pretty(&tokens));
        }

        ctx.logger.clear_tail();
        let run = run_transcoder(Path::new(ffmpeg), &tokens, &ctx.logger)
            .map_err(|e| StepError::io_error(format!("running {}", ffmpeg), e))?;

        if !run.success() {
            ctx.logger.show_tail("ffmpeg output");
            return Err(StepError::command_failed(
                "ffmpeg",
                run.exit_code,
                ctx.logger.tail().last().cloned().unwrap_or_default(),
            ));
        }

        ctx.logger.info(&format!("Wrote {}", output.display()));
        state.transcode = Some(TranscodeOutput {
            output_path: output.clone(),
            exit_code: Some(run.exit_code),
            command,
        });
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, ctx: &Context, _state: &RunState) -> StepResult<()> {
        let output = &ctx.output_path;
        let size = fs::metadata(output).map(|m| m.len()).unwrap_or(0);
        if size == 0 {
            return Err(StepError::invalid_output(format!(
                "Output missing or empty: {}",
                output.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::ArtifactPaths;
    use crate::config::Settings;
    use crate::jobs::DirectoryJob;
    use crate::orchestrator::test_support::{context_for, services_with, FakeProber};
    use crate::orchestrator::AlwaysNo;
    use tempfile::tempdir;

    fn job(root: &Path) -> DirectoryJob {
        DirectoryJob {
            name: "trip".to_string(),
            dir: root.to_path_buf(),
            videos: Vec::new(),
            thumbnail: None,
        }
    }

    fn state_with_artifacts(root: &Path) -> RunState {
        let mut state = RunState::new("trip");
        state.artifacts = Some(ArtifactPaths {
            concat_list: root.join("tmp/concat.txt"),
            metadata: root.join("tmp/meta.txt"),
            overlay_track: None,
        });
        state
    }

    #[test]
    fn declined_overwrite_keeps_existing_output() {
        let dir = tempdir().unwrap();
        let services = services_with(FakeProber::new(1.0), Box::new(AlwaysNo));
        let ctx = context_for(dir.path(), job(dir.path()), Settings::default(), services);
        fs::create_dir_all(ctx.output_path.parent().unwrap()).unwrap();
        fs::write(&ctx.output_path, b"old render").unwrap();

        let mut state = state_with_artifacts(dir.path());
        let outcome = TranscodeStep.execute(&ctx, &mut state).unwrap();

        assert!(matches!(outcome, StepOutcome::Skipped(_)));
        assert!(state.transcode.unwrap().reused_existing());
        assert_eq!(fs::read(&ctx.output_path).unwrap(), b"old render");
    }

    #[test]
    fn missing_ffmpeg_is_an_io_error() {
        let dir = tempdir().unwrap();
        let mut settings = Settings::default();
        settings.tools.ffmpeg = "/nonexistent/ffmpeg".to_string();
        let services = services_with(FakeProber::new(1.0), Box::new(AlwaysNo));
        let ctx = context_for(dir.path(), job(dir.path()), settings, services);

        let err = TranscodeStep
            .execute(&ctx, &mut state_with_artifacts(dir.path()))
            .unwrap_err();
        assert!(matches!(err, StepError::IoError { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_command_failed() {
        let dir = tempdir().unwrap();
        let mut settings = Settings::default();
        // `false` ignores its arguments and exits with 1
        settings.tools.ffmpeg = "false".to_string();
        let services = services_with(FakeProber::new(1.0), Box::new(AlwaysNo));
        let ctx = context_for(dir.path(), job(dir.path()), settings, services);

        let err = TranscodeStep
            .execute(&ctx, &mut state_with_artifacts(dir.path()))
            .unwrap_err();
        assert!(matches!(err, StepError::CommandFailed { exit_code: 1, .. }));
    }

    #[test]
    fn empty_output_fails_validation() {
        let dir = tempdir().unwrap();
        let services = services_with(FakeProber::new(1.0), Box::new(AlwaysNo));
        let ctx = context_for(dir.path(), job(dir.path()), Settings::default(), services);
        assert!(TranscodeStep
            .validate_output(&ctx, &RunState::new("trip"))
            .is_err());
    }
}
