//! Core types for the orchestrator pipeline.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::artifacts::ArtifactPaths;
use crate::config::Settings;
use crate::jobs::DirectoryJob;
use crate::logging::RunLogger;
use crate::models::{ConcatenationPlan, SourceFile};
use crate::probe::{FfprobeProber, MediaProber, ProbeCache};
use crate::publish::{SidecarUploader, Uploader};
use crate::timeline::TimelineAdjuster;

/// Yes/no decisions that need a user (overwrite, upload).
pub trait Prompter: Send + Sync {
    fn confirm(&self, question: &str) -> bool;

    /// Replace an existing output file?
    fn confirm_overwrite(&self, path: &Path) -> bool {
        self.confirm(&format!("Overwrite '{}'?", path.display()))
    }

    /// Hand a finished output to the uploader?
    fn confirm_upload(&self, path: &Path) -> bool {
        self.confirm(&format!("Upload '{}'?", path.display()))
    }
}

/// Answers every question with yes.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysYes;

impl Prompter for AlwaysYes {
    fn confirm(&self, question: &str) -> bool {
        tracing::debug!("{} yes", question);
        true
    }
}

/// Answers every question with no.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysNo;

impl Prompter for AlwaysNo {
    fn confirm(&self, question: &str) -> bool {
        tracing::debug!("{} no", question);
        false
    }
}

/// Services shared by every directory in one process run.
///
/// The probe cache and the timeline adjuster live here so that probes
/// are never repeated and the absolute-date anchor, once fixed by the
/// first clip, applies to every later directory.
pub struct RunServices {
    pub probe_cache: ProbeCache<Box<dyn MediaProber>>,
    pub adjuster: TimelineAdjuster,
    pub prompter: Box<dyn Prompter>,
    pub uploader: Box<dyn Uploader>,
}

impl RunServices {
    pub fn new(
        prober: Box<dyn MediaProber>,
        adjuster: TimelineAdjuster,
        prompter: Box<dyn Prompter>,
        uploader: Box<dyn Uploader>,
    ) -> Self {
        Self {
            probe_cache: ProbeCache::new(prober),
            adjuster,
            prompter,
            uploader,
        }
    }

    /// ffprobe from the settings, the sidecar uploader and the given prompter.
    pub fn from_settings(
        settings: &Settings,
        adjuster: TimelineAdjuster,
        prompter: Box<dyn Prompter>,
    ) -> Self {
        Self::new(
            Box::new(FfprobeProber::new(&settings.tools.ffprobe)),
            adjuster,
            prompter,
            Box::new(SidecarUploader::new()),
        )
    }
}

/// Read-only context passed to pipeline steps.
pub struct Context {
    pub settings: Settings,
    pub job: DirectoryJob,
    /// Scratch directory for this run's artifacts.
    pub work_dir: PathBuf,
    /// Final output file.
    pub output_path: PathBuf,
    pub logger: Arc<RunLogger>,
    pub services: Arc<RunServices>,
}

impl Context {
    pub fn new(
        settings: Settings,
        job: DirectoryJob,
        work_dir: PathBuf,
        output_path: PathBuf,
        logger: Arc<RunLogger>,
        services: Arc<RunServices>,
    ) -> Self {
        Self {
            settings,
            job,
            work_dir,
            output_path,
            logger,
            services,
        }
    }

    pub fn run_name(&self) -> &str {
        &self.job.name
    }
}

/// State accumulated by the steps of one directory run.
///
/// Each step writes its own field and reads the ones before it.
#[derive(Debug, Default)]
pub struct RunState {
    pub run_name: String,
    pub started_at: Option<String>,
    /// Probed clips in processing order.
    pub sources: Vec<Arc<SourceFile>>,
    pub plan: Option<ConcatenationPlan>,
    pub artifacts: Option<ArtifactPaths>,
    pub transcode: Option<TranscodeOutput>,
    pub publish: Option<PublishOutput>,
}

impl RunState {
    pub fn new(run_name: impl Into<String>) -> Self {
        Self {
            run_name: run_name.into(),
            started_at: Some(chrono::Local::now().to_rfc3339()),
            ..Default::default()
        }
    }

    pub fn has_plan(&self) -> bool {
        self.plan.is_some()
    }
}

/// Output from the Transcode step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscodeOutput {
    pub output_path: PathBuf,
    /// `None` when an existing output was kept.
    pub exit_code: Option<i32>,
    /// Command line as logged.
    pub command: String,
}

impl TranscodeOutput {
    pub fn reused_existing(&self) -> bool {
        self.exit_code.is_none()
    }
}

/// Output from the Publish step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishOutput {
    pub uploader: String,
    pub artifacts: Vec<PathBuf>,
}

/// Result of executing a pipeline step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Success,
    /// Step chose not to run (not an error).
    Skipped(String),
}
