//! Enum types used across the crate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How the per-second wall-clock overlay is delivered, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayMode {
    /// No overlay track is generated.
    #[default]
    Off,
    /// Overlay is composited into the video through a subtitles filter.
    Hard,
    /// Overlay is carried as a separate subtitle stream.
    Soft,
}

impl OverlayMode {
    /// Whether an overlay track must be generated.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, OverlayMode::Off)
    }

    /// Parse from a string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "off" | "none" => Some(OverlayMode::Off),
            "hard" | "burned" | "burn" => Some(OverlayMode::Hard),
            "soft" => Some(OverlayMode::Soft),
            _ => None,
        }
    }
}

impl fmt::Display for OverlayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayMode::Off => write!(f, "off"),
            OverlayMode::Hard => write!(f, "hard"),
            OverlayMode::Soft => write!(f, "soft"),
        }
    }
}

/// Kind of an elementary stream reported by the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamKind {
    Video,
    Audio,
    Subtitle,
    Data,
    Attachment,
    Other,
}

impl StreamKind {
    /// Map an ffprobe `codec_type` value.
    pub fn from_codec_type(s: &str) -> Self {
        match s {
            "video" => StreamKind::Video,
            "audio" => StreamKind::Audio,
            "subtitle" => StreamKind::Subtitle,
            "data" => StreamKind::Data,
            "attachment" => StreamKind::Attachment,
            _ => StreamKind::Other,
        }
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StreamKind::Video => "video",
            StreamKind::Audio => "audio",
            StreamKind::Subtitle => "subtitle",
            StreamKind::Data => "data",
            StreamKind::Attachment => "attachment",
            StreamKind::Other => "other",
        };
        write!(f, "{}", s)
    }
}
