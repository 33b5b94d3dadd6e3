//! Media structures: probe results and source files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::StreamKind;

/// Technical metadata for one media file, as reported by the probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    /// Container duration in seconds, rounded to 2 decimal places.
    pub duration_seconds: f64,
    /// Container format name (e.g., "matroska,webm").
    pub format_name: String,
    /// Elementary streams in probe order.
    pub streams: Vec<StreamInfo>,
    /// Number of chapters already embedded in the file.
    pub chapter_count: usize,
}

impl MediaInfo {
    /// Create media info with the given duration and no streams.
    pub fn new(duration_seconds: f64) -> Self {
        Self {
            duration_seconds: round_centis(duration_seconds),
            format_name: String::new(),
            streams: Vec::new(),
            chapter_count: 0,
        }
    }

    /// Add a stream (builder pattern).
    pub fn with_stream(mut self, stream: StreamInfo) -> Self {
        self.streams.push(stream);
        self
    }

    /// First video stream, if any.
    pub fn video_stream(&self) -> Option<&StreamInfo> {
        self.streams.iter().find(|s| s.kind == StreamKind::Video)
    }

    /// Whether the file carries at least one audio stream.
    pub fn has_audio(&self) -> bool {
        self.streams.iter().any(|s| s.kind == StreamKind::Audio)
    }
}

/// One elementary stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamInfo {
    pub index: usize,
    pub kind: StreamKind,
    pub codec_name: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl StreamInfo {
    pub fn new(index: usize, kind: StreamKind, codec_name: impl Into<String>) -> Self {
        Self {
            index,
            kind,
            codec_name: codec_name.into(),
            width: None,
            height: None,
        }
    }

    /// Set the frame size (video only).
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

/// A source clip placed into the timeline.
///
/// `modification_time` marks the instant the recording *ended*; the start
/// is always derived as `modification_time - duration_seconds`.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Absolute path of the clip.
    pub path: PathBuf,
    /// Clip duration in seconds (2 decimal places).
    pub duration_seconds: f64,
    /// Last-modified time in local wall-clock time.
    pub modification_time: NaiveDateTime,
    /// Cached probe result.
    pub media: Arc<MediaInfo>,
}

impl SourceFile {
    /// Create a source file from a probe result and its modification time.
    pub fn new(path: impl Into<PathBuf>, media: Arc<MediaInfo>, modification_time: NaiveDateTime) -> Self {
        Self {
            path: path.into(),
            duration_seconds: media.duration_seconds,
            modification_time,
            media,
        }
    }

    /// File name used for segment annotations and logs.
    pub fn file_name(&self) -> String {
        file_name_of(&self.path)
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Round seconds to 2 decimal places.
pub(crate) fn round_centis(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}
