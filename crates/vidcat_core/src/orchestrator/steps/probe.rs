//! Probe step - reads duration and modification time of every clip.

use std::sync::Arc;

use crate::models::{MediaInfo, SourceFile};
use crate::orchestrator::errors::{StepError, StepResult};
use crate::orchestrator::step::PipelineStep;
use crate::orchestrator::types::{Context, RunState, StepOutcome};

/// Probes the directory's clips through the shared cache.
pub struct ProbeStep;

impl ProbeStep {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProbeStep {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStep for ProbeStep {
    fn name(&self) -> &str {
        "Probe"
    }

    fn description(&self) -> &str {
        "Read clip durations and modification times"
    }

    fn validate_input(&self, ctx: &Context) -> StepResult<()> {
        if !ctx.job.has_videos() {
            return Err(StepError::invalid_input(format!(
                "No video files found in {}",
                ctx.job.dir.display()
            )));
        }
        Ok(())
    }

    fn execute(&self, ctx: &Context, state: &mut RunState) -> StepResult<StepOutcome> {
        let cache = &ctx.services.probe_cache;
        cache.prefetch(&ctx.job.videos);

        for path in &ctx.job.videos {
            let source = SourceFile::load(path, cache)?;
            ctx.logger.info(&format!(
                "{}: {:.2}s, modified {}",
                source.file_name(),
                source.duration_seconds,
                source.modification_time.format("%Y-%m-%d %H:%M:%S")
            ));
            if !source.media.streams.is_empty() {
                ctx.logger.debug(&format!("{}: {}", source.file_name(), stream_summary(&source.media)));
                if !source.media.has_audio() {
                    ctx.logger.warn(&format!(
                        "{} has no audio stream; the concat demuxer expects matching streams",
                        source.file_name()
                    ));
                }
            }
            state.sources.push(Arc::new(source));
        }

        ctx.logger.debug(&format!(
            "Probe cache: {} probe(s) for {} path(s)",
            cache.probe_count(),
            cache.len()
        ));
        Ok(StepOutcome::Success)
    }

    fn validate_output(&self, ctx: &Context, state: &RunState) -> StepResult<()> {
        if state.sources.len() != ctx.job.videos.len() {
            return Err(StepError::invalid_output(format!(
                "Probed {} of {} clips",
                state.sources.len(),
                ctx.job.videos.len()
            )));
        }
        Ok(())
    }
}

/// e.g. `h264 1920x1080, audio`
fn stream_summary(media: &MediaInfo) -> String {
    let video = match media.video_stream() {
        Some(v) => match (v.width, v.height) {
            (Some(w), Some(h)) => format!("{} {}x{}", v.codec_name, w, h),
            _ => v.codec_name.clone(),
        },
        None => "no video".to_string(),
    };
    let audio = if media.has_audio() { "audio" } else { "no audio" };
    format!("{}, {}", video, audio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::jobs::DirectoryJob;
    use crate::models::{StreamInfo, StreamKind};
    use crate::orchestrator::test_support::{context_for, services_with, test_context, FakeProber};
    use crate::orchestrator::AlwaysYes;
    use crate::probe::ProbeError;
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::Ordering;
    use tempfile::tempdir;

    fn job_with(root: &Path, names: &[&str]) -> DirectoryJob {
        let videos = names
            .iter()
            .map(|n| {
                let p = root.join(n);
                fs::write(&p, b"x").unwrap();
                p
            })
            .collect();
        DirectoryJob {
            name: "trip".to_string(),
            dir: root.to_path_buf(),
            videos,
            thumbnail: None,
        }
    }

    #[test]
    fn summarises_streams() {
        let media = MediaInfo::new(3.0)
            .with_stream(StreamInfo::new(0, StreamKind::Video, "h264").with_size(1920, 1080))
            .with_stream(StreamInfo::new(1, StreamKind::Audio, "aac"));
        assert_eq!(stream_summary(&media), "h264 1920x1080, audio");

        let silent = MediaInfo::new(3.0).with_stream(StreamInfo::new(0, StreamKind::Video, "mjpeg"));
        assert_eq!(stream_summary(&silent), "mjpeg, no audio");
    }

    #[test]
    fn empty_directory_is_invalid_input() {
        let dir = tempdir().unwrap();
        let ctx = test_context(dir.path());
        assert!(matches!(ProbeStep.validate_input(&ctx), Err(StepError::InvalidInput(_))));
    }

    #[test]
    fn probes_each_clip_once_in_order() {
        let dir = tempdir().unwrap();
        let prober = FakeProber::new(10.0).with_duration("b.mp4", 4.5);
        let calls = Arc::clone(&prober.calls);
        let services = services_with(prober, Box::new(AlwaysYes));
        let job = job_with(dir.path(), &["a.mp4", "b.mp4"]);
        let ctx = context_for(dir.path(), job, Settings::default(), services);

        let mut state = RunState::new("trip");
        ProbeStep.execute(&ctx, &mut state).unwrap();
        ProbeStep.validate_output(&ctx, &state).unwrap();

        let durations: Vec<f64> = state.sources.iter().map(|s| s.duration_seconds).collect();
        assert_eq!(durations, vec![10.0, 4.5]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn probe_failure_names_the_file() {
        let dir = tempdir().unwrap();
        let services = services_with(FakeProber::new(10.0), Box::new(AlwaysYes));
        let job = job_with(dir.path(), &["a.mp4", "broken.mp4"]);
        let ctx = context_for(dir.path(), job, Settings::default(), services);

        let err = ProbeStep.execute(&ctx, &mut RunState::new("trip")).unwrap_err();
        match err {
            StepError::Probe(ProbeError::ProbeFailure { path, .. }) => {
                assert!(path.ends_with("broken.mp4"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
