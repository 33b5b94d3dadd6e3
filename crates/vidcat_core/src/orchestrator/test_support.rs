//! Fixtures shared by orchestrator tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::types::{AlwaysYes, Context, Prompter, RunServices};
use crate::config::Settings;
use crate::jobs::DirectoryJob;
use crate::logging::{LogConfig, RunLogger};
use crate::models::MediaInfo;
use crate::probe::{MediaProber, ProbeError, ProbeResult};
use crate::publish::SidecarUploader;
use crate::timeline::TimelineAdjuster;

/// Prober that answers from a table of file names, counting calls.
///
/// Files whose name contains "broken" fail to probe.
pub struct FakeProber {
    durations: HashMap<String, f64>,
    default_duration: f64,
    pub calls: Arc<AtomicUsize>,
}

impl FakeProber {
    pub fn new(default_duration: f64) -> Self {
        Self {
            durations: HashMap::new(),
            default_duration,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_duration(mut self, file_name: &str, seconds: f64) -> Self {
        self.durations.insert(file_name.to_string(), seconds);
        self
    }
}

impl MediaProber for FakeProber {
    fn probe(&self, path: &Path) -> ProbeResult<MediaInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !path.exists() {
            return Err(ProbeError::FileNotFound(path.to_path_buf()));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if name.contains("broken") {
            return Err(ProbeError::failure(path, "moov atom not found"));
        }

        let duration = self.durations.get(&name).copied().unwrap_or(self.default_duration);
        Ok(MediaInfo::new(duration))
    }
}

pub fn services_with(prober: FakeProber, prompter: Box<dyn Prompter>) -> Arc<RunServices> {
    Arc::new(RunServices::new(
        Box::new(prober),
        TimelineAdjuster::default(),
        prompter,
        Box::new(SidecarUploader::new()),
    ))
}

/// Context for a job rooted at `root`, with logs under `root/logs`.
pub fn context_for(
    root: &Path,
    job: DirectoryJob,
    settings: Settings,
    services: Arc<RunServices>,
) -> Context {
    let logger = RunLogger::new(&job.name, root.join("logs"), LogConfig::default(), None).unwrap();
    let output_path = root.join("output").join(job.output_file_name(settings.encode.test_mode));
    Context::new(
        settings,
        job,
        root.join("tmp"),
        output_path,
        Arc::new(logger),
        services,
    )
}

/// Context with an empty job, for tests that don't touch clips.
pub fn test_context(root: &Path) -> Context {
    let job = DirectoryJob {
        name: "test".to_string(),
        dir: root.to_path_buf(),
        videos: Vec::<PathBuf>::new(),
        thumbnail: None,
    };
    context_for(
        root,
        job,
        Settings::default(),
        services_with(FakeProber::new(10.0), Box::new(AlwaysYes)),
    )
}
