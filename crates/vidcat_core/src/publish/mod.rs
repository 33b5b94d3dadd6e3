//! Hand-off of a finished output to an upload service.
//!
//! The core never talks to a video host itself. It builds an
//! [`UploadRequest`] and passes it to an [`Uploader`]; the shipped
//! [`SidecarUploader`] writes the request next to the output file so an
//! external uploader can pick it up.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Everything an upload service needs for one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadRequest {
    pub video_path: PathBuf,
    pub title: String,
    /// Chapter-style description, one line per segment.
    pub description: String,
    /// Thumbnail image as found in the input directory (not resized).
    pub thumbnail: Option<PathBuf>,
}

/// Where an upload request ended up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
    /// Files written or identifiers returned by the service.
    pub artifacts: Vec<PathBuf>,
}

/// Something that accepts finished videos.
pub trait Uploader: Send + Sync {
    fn name(&self) -> &str;

    fn upload(&self, request: &UploadRequest) -> io::Result<UploadReceipt>;
}

/// Writes `<output>.description.txt` and `<output>.upload.json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SidecarUploader;

impl SidecarUploader {
    pub fn new() -> Self {
        Self
    }

    /// Sidecar path for `video` with `suffix` appended to its file name.
    fn sidecar(video: &Path, suffix: &str) -> PathBuf {
        let mut name = video
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(suffix);
        video.with_file_name(name)
    }
}

impl Uploader for SidecarUploader {
    fn name(&self) -> &str {
        "sidecar"
    }

    fn upload(&self, request: &UploadRequest) -> io::Result<UploadReceipt> {
        let description_path = Self::sidecar(&request.video_path, ".description.txt");
        fs::write(&description_path, &request.description)?;

        let request_path = Self::sidecar(&request.video_path, ".upload.json");
        let json = serde_json::to_string_pretty(request)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&request_path, json)?;

        tracing::info!("Upload request written to {}", request_path.display());

        Ok(UploadReceipt {
            artifacts: vec![description_path, request_path],
        })
    }
}
