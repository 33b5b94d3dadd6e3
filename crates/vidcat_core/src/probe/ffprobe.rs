//! Media probing using ffprobe.
//!
//! Runs `ffprobe -show_format -show_streams -show_chapters -print_format
//! json -loglevel quiet <file>` and reads the duration, container format,
//! streams and chapter count from its JSON.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;

use super::types::{ProbeError, ProbeResult};
use crate::models::{MediaInfo, StreamInfo, StreamKind};

/// Something that can report the technical metadata of a clip.
pub trait MediaProber: Send + Sync {
    /// Probe one file.
    fn probe(&self, path: &Path) -> ProbeResult<MediaInfo>;
}

impl<T: MediaProber + ?Sized> MediaProber for Box<T> {
    fn probe(&self, path: &Path) -> ProbeResult<MediaInfo> {
        (**self).probe(path)
    }
}

/// Prober backed by the `ffprobe` binary.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    binary: PathBuf,
}

impl FfprobeProber {
    /// Use the given ffprobe binary (a bare name is looked up on `PATH`).
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl Default for FfprobeProber {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

impl MediaProber for FfprobeProber {
    fn probe(&self, path: &Path) -> ProbeResult<MediaInfo> {
        if !path.exists() {
            return Err(ProbeError::FileNotFound(path.to_path_buf()));
        }

        tracing::debug!("Probing file: {}", path.display());

        let output = Command::new(&self.binary)
            .args(["-show_format", "-show_streams", "-show_chapters"])
            .args(["-print_format", "json", "-loglevel", "quiet"])
            .arg(path)
            .output()
            .map_err(|e| {
                ProbeError::failure(
                    path,
                    format!("Failed to run {}: {}", self.binary.display(), e),
                )
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProbeError::failure(
                path,
                format!(
                    "ffprobe exited with code {}: {}",
                    output.status.code().unwrap_or(-1),
                    stderr.trim()
                ),
            ));
        }

        let json: Value = serde_json::from_slice(&output.stdout)
            .map_err(|e| ProbeError::failure(path, format!("Invalid ffprobe JSON: {}", e)))?;

        parse_probe_json(&json, path)
    }
}

/// Parse the JSON output of ffprobe.
///
/// The container duration is required; everything else is optional.
pub(crate) fn parse_probe_json(json: &Value, path: &Path) -> ProbeResult<MediaInfo> {
    let format = json
        .get("format")
        .ok_or_else(|| ProbeError::failure(path, "ffprobe output has no format section"))?;

    // ffprobe reports the duration as a decimal string
    let duration = format
        .get("duration")
        .and_then(|d| match d {
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Number(n) => n.as_f64(),
            _ => None,
        })
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| ProbeError::failure(path, "no usable container duration"))?;

    let mut info = MediaInfo::new(duration);
    info.format_name = format
        .get("format_name")
        .and_then(|f| f.as_str())
        .unwrap_or("unknown")
        .to_string();

    if let Some(streams) = json.get("streams").and_then(|s| s.as_array()) {
        for stream in streams {
            if let Some(parsed) = parse_stream(stream) {
                info.streams.push(parsed);
            }
        }
    }

    info.chapter_count = json
        .get("chapters")
        .and_then(|c| c.as_array())
        .map(|c| c.len())
        .unwrap_or(0);

    Ok(info)
}

fn parse_stream(stream: &Value) -> Option<StreamInfo> {
    let index = stream.get("index")?.as_u64()? as usize;
    let kind = StreamKind::from_codec_type(stream.get("codec_type")?.as_str()?);
    let codec_name = stream
        .get("codec_name")
        .and_then(|c| c.as_str())
        .unwrap_or("");

    let mut info = StreamInfo::new(index, kind, codec_name);

    let width = stream.get("width").and_then(|w| w.as_u64());
    let height = stream.get("height").and_then(|h| h.as_u64());
    if let (Some(w), Some(h)) = (width, height) {
        info = info.with_size(w as u32, h as u32);
    }

    Some(info)
}
