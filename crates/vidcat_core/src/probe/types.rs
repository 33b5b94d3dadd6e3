//! Probe error type.

use std::path::PathBuf;

/// Errors raised while probing a clip.
///
/// Cloneable so a single failure can be shared by every caller waiting
/// on the same path.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProbeError {
    /// The clip does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The probe tool failed or its output could not be read.
    #[error("Failed to probe {}: {message}", path.display())]
    ProbeFailure { path: PathBuf, message: String },
}

impl ProbeError {
    /// Create a probe failure.
    pub fn failure(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ProbeFailure {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Path of the clip the error refers to.
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::FileNotFound(path) => path,
            Self::ProbeFailure { path, .. } => path,
        }
    }
}

/// Result type for probe operations.
pub type ProbeResult<T> = Result<T, ProbeError>;
