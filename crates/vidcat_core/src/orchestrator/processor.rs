//! Directory processor.
//!
//! Runs the standard pipeline once per input directory. A failing
//! directory is reported and the next one is processed; the scratch
//! directory is cleaned up either way unless `keep_temp` is set.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Settings;
use crate::jobs::{discover_directory, DirectoryJob};
use crate::logging::{LogCallback, RunLogger};

use super::create_standard_pipeline;
use super::errors::PipelineError;
use super::pipeline::CancelHandle;
use super::types::{Context, RunServices, RunState};

/// Outcome for one input directory.
#[derive(Debug, Clone)]
pub struct DirectoryResult {
    pub dir: PathBuf,
    pub run_name: String,
    pub success: bool,
    pub output_path: Option<PathBuf>,
    pub error: Option<String>,
    pub steps_completed: Vec<String>,
    pub steps_skipped: Vec<String>,
}

impl DirectoryResult {
    fn failure(dir: &Path, run_name: impl Into<String>, error: &PipelineError) -> Self {
        Self {
            dir: dir.to_path_buf(),
            run_name: run_name.into(),
            success: false,
            output_path: None,
            error: Some(error.to_string()),
            steps_completed: Vec::new(),
            steps_skipped: Vec::new(),
        }
    }
}

/// Builds a per-run log sink from the run name.
pub type LogCallbackFactory = Box<dyn Fn(&str) -> Option<LogCallback> + Send + Sync>;

/// Processes input directories one after another.
pub struct RunProcessor {
    settings: Settings,
    services: Arc<RunServices>,
    log_callback_factory: Option<LogCallbackFactory>,
}

impl RunProcessor {
    pub fn new(settings: Settings, services: RunServices) -> Self {
        Self {
            settings,
            services: Arc::new(services),
            log_callback_factory: None,
        }
    }

    /// Mirror every run log line to an extra sink.
    pub fn with_log_callback_factory(mut self, factory: LogCallbackFactory) -> Self {
        self.log_callback_factory = Some(factory);
        self
    }

    pub fn services(&self) -> &RunServices {
        &self.services
    }

    /// Process every directory in order.
    pub fn process_all(&self, dirs: &[PathBuf], cancel: Option<&CancelHandle>) -> Vec<DirectoryResult> {
        let mut results = Vec::with_capacity(dirs.len());

        for (i, dir) in dirs.iter().enumerate() {
            if cancel.is_some_and(|handle| handle.is_cancelled()) {
                tracing::info!("Processing cancelled at directory {}/{}", i + 1, dirs.len());
                break;
            }

            tracing::info!("[{}/{}] {}", i + 1, dirs.len(), dir.display());
            let result = self.process(dir, cancel);
            match &result.error {
                None => tracing::info!("{} finished", result.run_name),
                Some(e) => tracing::error!("{}", e),
            }
            results.push(result);
        }

        results
    }

    /// Run the pipeline for one directory.
    fn process(&self, dir: &Path, cancel: Option<&CancelHandle>) -> DirectoryResult {
        let fallback_name = dir.display().to_string();

        let job = match discover_directory(dir, &self.settings.discovery) {
            Ok(job) => job,
            Err(e) => {
                let err = PipelineError::setup_failed(&fallback_name, format!("cannot read directory: {}", e));
                return DirectoryResult::failure(dir, fallback_name, &err);
            }
        };

        let paths = &self.settings.paths;
        let work_dir = paths.temp_dir(&job.dir);
        let output_path = paths
            .output_dir(&job.dir)
            .join(job.output_file_name(self.settings.encode.test_mode));

        let result = match self.prepare(&job, &work_dir) {
            Ok(logger) => self.run(job, work_dir.clone(), output_path, logger, cancel),
            Err(e) => {
                let err = PipelineError::setup_failed(&job.name, e.to_string());
                DirectoryResult::failure(&job.dir, &job.name, &err)
            }
        };

        if !self.settings.publish.keep_temp {
            if let Err(e) = remove_dir_if_present(&work_dir) {
                tracing::warn!("Could not remove {}: {}", work_dir.display(), e);
            }
        }

        result
    }

    /// Empty the scratch directory and open the run log.
    fn prepare(&self, job: &DirectoryJob, work_dir: &Path) -> io::Result<Arc<RunLogger>> {
        remove_dir_if_present(work_dir)?;
        fs::create_dir_all(work_dir)?;

        let callback = self
            .log_callback_factory
            .as_ref()
            .and_then(|factory| factory(&job.name));
        let logger = RunLogger::new(
            &job.name,
            self.settings.paths.logs_dir(&job.dir),
            self.settings.logging.log_config(),
            callback,
        )?;
        Ok(Arc::new(logger))
    }

    fn run(
        &self,
        job: DirectoryJob,
        work_dir: PathBuf,
        output_path: PathBuf,
        logger: Arc<RunLogger>,
        cancel: Option<&CancelHandle>,
    ) -> DirectoryResult {
        let dir = job.dir.clone();
        let run_name = job.name.clone();
        let ctx = Context::new(
            self.settings.clone(),
            job,
            work_dir,
            output_path.clone(),
            Arc::clone(&logger),
            Arc::clone(&self.services),
        );

        logger.info(&format!("Run: {} ({} clip(s))", run_name, ctx.job.videos.len()));
        logger.info(&format!("Output: {}", output_path.display()));

        let mut state = RunState::new(&run_name);
        let mut pipeline = create_standard_pipeline();
        if let Some(handle) = cancel {
            pipeline = pipeline.with_cancel_handle(handle.clone());
        }

        let result = match pipeline.run(&ctx, &mut state) {
            Ok(run) => DirectoryResult {
                dir,
                run_name,
                success: true,
                output_path: Some(output_path),
                error: None,
                steps_completed: run.steps_completed,
                steps_skipped: run.steps_skipped,
            },
            Err(e) => {
                logger.error(&e.to_string());
                DirectoryResult::failure(&dir, run_name, &e)
            }
        };

        logger.close();
        result
    }
}

fn remove_dir_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_dir_all(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
