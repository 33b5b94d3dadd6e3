//! Pipeline errors.
//!
//! A [`StepError`] says what went wrong inside one step; the processor
//! wraps it in a [`PipelineError`] naming the directory run and the step,
//! so a summary line reads `run 'beach' stopped in Probe: ...`.

use std::io;

use thiserror::Error;

use crate::probe::ProbeError;
use crate::timeline::TimelineError;

/// Why one directory run did not finish.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("run '{run_name}' stopped in {step_name}: {source}")]
    StepFailed {
        run_name: String,
        step_name: String,
        #[source]
        source: StepError,
    },

    /// Discovery, scratch directory or log file could not be prepared.
    #[error("run '{run_name}' setup failed: {message}")]
    SetupFailed { run_name: String, message: String },

    #[error("run '{run_name}' cancelled before completion")]
    Cancelled { run_name: String },
}

impl PipelineError {
    pub fn step_failed(run_name: impl Into<String>, step_name: impl Into<String>, source: StepError) -> Self {
        Self::StepFailed {
            run_name: run_name.into(),
            step_name: step_name.into(),
            source,
        }
    }

    pub fn setup_failed(run_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SetupFailed {
            run_name: run_name.into(),
            message: message.into(),
        }
    }

    pub fn cancelled(run_name: impl Into<String>) -> Self {
        Self::Cancelled { run_name: run_name.into() }
    }
}

/// Failure inside a single step.
#[derive(Error, Debug)]
pub enum StepError {
    #[error("bad input: {0}")]
    InvalidInput(String),

    #[error("bad result: {0}")]
    InvalidOutput(String),

    /// ffmpeg (or another child process) exited unsuccessfully.
    #[error("{tool} exited with status {exit_code}: {message}")]
    CommandFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    #[error("{operation}: {source}")]
    IoError {
        operation: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Timeline(#[from] TimelineError),

    #[error(transparent)]
    Probe(#[from] ProbeError),

    /// The run state lacks something an earlier step should have stored.
    #[error("missing run state: {0}")]
    MissingState(String),

    #[error("{0}")]
    Other(String),
}

impl StepError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_output(message: impl Into<String>) -> Self {
        Self::InvalidOutput(message.into())
    }

    pub fn command_failed(tool: impl Into<String>, exit_code: i32, message: impl Into<String>) -> Self {
        Self::CommandFailed {
            tool: tool.into(),
            exit_code,
            message: message.into(),
        }
    }

    pub fn io_error(operation: impl Into<String>, source: io::Error) -> Self {
        Self::IoError {
            operation: operation.into(),
            source,
        }
    }

    pub fn missing_state(what: impl Into<String>) -> Self {
        Self::MissingState(what.into())
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

pub type StepResult<T> = Result<T, StepError>;

pub type PipelineResult<T> = Result<T, PipelineError>;
