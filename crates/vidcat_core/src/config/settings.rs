//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::logging::{LogConfig, LogLevel};
use crate::models::OverlayMode;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub paths: PathSettings,

    #[serde(default)]
    pub logging: LoggingSettings,

    /// Transcoder codecs, filters and test mode.
    #[serde(default)]
    pub encode: EncodeSettings,

    /// Overlay and wall-clock adjustment.
    #[serde(default)]
    pub timestamps: TimestampSettings,

    /// Which files in a directory are clips and thumbnails.
    #[serde(default)]
    pub discovery: DiscoverySettings,

    #[serde(default)]
    pub publish: PublishSettings,

    /// External binaries.
    #[serde(default)]
    pub tools: ToolSettings,
}

/// Output, scratch and log locations.
///
/// Relative paths are resolved against each input directory; the logs
/// folder is resolved against the output folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSettings {
    #[serde(default = "default_output_folder")]
    pub output_folder: String,

    /// Scratch directory for concat list, metadata and overlay track.
    #[serde(default = "default_temp_folder")]
    pub temp_folder: String,

    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,
}

fn default_output_folder() -> String {
    "output".to_string()
}

fn default_temp_folder() -> String {
    "tmp".to_string()
}

fn default_logs_folder() -> String {
    "logs".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            output_folder: default_output_folder(),
            temp_folder: default_temp_folder(),
            logs_folder: default_logs_folder(),
        }
    }
}

impl PathSettings {
    /// Output folder for one input directory.
    pub fn output_dir(&self, input_dir: &Path) -> PathBuf {
        resolve(input_dir, &self.output_folder)
    }

    /// Scratch folder for one input directory.
    pub fn temp_dir(&self, input_dir: &Path) -> PathBuf {
        resolve(input_dir, &self.temp_folder)
    }

    /// Logs folder for one input directory.
    pub fn logs_dir(&self, input_dir: &Path) -> PathBuf {
        resolve(&self.output_dir(input_dir), &self.logs_folder)
    }
}

fn resolve(base: &Path, folder: &str) -> PathBuf {
    let path = Path::new(folder);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default)]
    pub level: LogLevel,

    /// Keep transcoder output out of run logs except on failure.
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Transcoder output lines shown when it fails.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Log transcoder arguments one option per line.
    #[serde(default)]
    pub show_args_pretty: bool,
}

fn default_true() -> bool {
    true
}

fn default_error_tail() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            compact: true,
            error_tail: default_error_tail(),
            show_args_pretty: false,
        }
    }
}

impl LoggingSettings {
    /// Run logger configuration for these settings.
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.level,
            compact: self.compact,
            error_tail: self.error_tail as usize,
            show_timestamps: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodeSettings {
    /// Scale filter argument (e.g. `1280:-2`); empty means no scaling.
    #[serde(default)]
    pub scale: String,

    #[serde(default = "default_video_codec")]
    pub video_codec: String,

    #[serde(default)]
    pub video_preset: Option<String>,

    /// Comma-separated `key=value` codec options.
    #[serde(default)]
    pub video_options: Option<String>,

    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    #[serde(default)]
    pub audio_preset: Option<String>,

    #[serde(default = "default_audio_options")]
    pub audio_options: Option<String>,

    /// Truncate output to the first minute.
    #[serde(default)]
    pub test_mode: bool,
}

fn default_video_codec() -> String {
    "copy".to_string()
}

fn default_audio_codec() -> String {
    "aac".to_string()
}

fn default_audio_options() -> Option<String> {
    Some("b:a=160k".to_string())
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            scale: String::new(),
            video_codec: default_video_codec(),
            video_preset: None,
            video_options: None,
            audio_codec: default_audio_codec(),
            audio_preset: None,
            audio_options: default_audio_options(),
            test_mode: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimestampSettings {
    #[serde(default)]
    pub overlay: OverlayMode,

    /// Relative deltas (`+1 year -2 days`) or an absolute date.
    #[serde(default)]
    pub adjust_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoverySettings {
    /// Lowercase extensions, without the dot.
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,

    #[serde(default = "default_thumbnail_extensions")]
    pub thumbnail_extensions: Vec<String>,
}

fn default_video_extensions() -> Vec<String> {
    ["avi", "mp4", "mkv", "qt"].iter().map(|s| s.to_string()).collect()
}

fn default_thumbnail_extensions() -> Vec<String> {
    ["png", "jpg", "jpeg", "bmp", "gif"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            video_extensions: default_video_extensions(),
            thumbnail_extensions: default_thumbnail_extensions(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublishSettings {
    /// Publish without asking.
    #[serde(default)]
    pub auto_upload: bool,

    /// Leave the scratch directory in place after the run.
    #[serde(default)]
    pub keep_temp: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,

    #[serde(default = "default_ffprobe")]
    pub ffprobe: String,
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe() -> String {
    "ffprobe".to_string()
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            ffmpeg: default_ffmpeg(),
            ffprobe: default_ffprobe(),
        }
    }
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Paths,
    Logging,
    Encode,
    Timestamps,
    Discovery,
    Publish,
    Tools,
}

impl ConfigSection {
    pub const ALL: [ConfigSection; 7] = [
        ConfigSection::Paths,
        ConfigSection::Logging,
        ConfigSection::Encode,
        ConfigSection::Timestamps,
        ConfigSection::Discovery,
        ConfigSection::Publish,
        ConfigSection::Tools,
    ];

    /// TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Logging => "logging",
            ConfigSection::Encode => "encode",
            ConfigSection::Timestamps => "timestamps",
            ConfigSection::Discovery => "discovery",
            ConfigSection::Publish => "publish",
            ConfigSection::Tools => "tools",
        }
    }

    /// Comment written above the table in generated files.
    pub fn comment(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "Output, scratch and log folders (relative to each input directory)",
            ConfigSection::Logging => "Logging configuration",
            ConfigSection::Encode => "Transcoder codecs and filters",
            ConfigSection::Timestamps => "Wall-clock overlay (off, hard, soft) and date adjustment",
            ConfigSection::Discovery => "File extensions treated as clips and thumbnails",
            ConfigSection::Publish => "Upload hand-off and scratch retention",
            ConfigSection::Tools => "External binaries",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_serializes() {
        let toml = toml::to_string_pretty(&Settings::default()).unwrap();
        assert!(toml.contains("[paths]"));
        assert!(toml.contains("[encode]"));
        assert!(toml.contains("video_codec = \"copy\""));
        assert!(toml.contains("level = \"info\""));
    }

    #[test]
    fn missing_fields_use_defaults() {
        let minimal = "[encode]\nvideo_codec = \"libx264\"\n\n[timestamps]\noverlay = \"hard\"";
        let parsed: Settings = toml::from_str(minimal).unwrap();

        assert_eq!(parsed.encode.video_codec, "libx264");
        assert_eq!(parsed.encode.audio_codec, "aac");
        assert_eq!(parsed.encode.audio_options.as_deref(), Some("b:a=160k"));
        assert_eq!(parsed.timestamps.overlay, OverlayMode::Hard);
        assert_eq!(parsed.paths.temp_folder, "tmp");
        assert!(parsed.logging.compact);
    }

    #[test]
    fn relative_paths_resolve_against_input_dir() {
        let paths = PathSettings::default();
        let dir = Path::new("/videos/trip");

        assert_eq!(paths.output_dir(dir), PathBuf::from("/videos/trip/output"));
        assert_eq!(paths.temp_dir(dir), PathBuf::from("/videos/trip/tmp"));
        assert_eq!(paths.logs_dir(dir), PathBuf::from("/videos/trip/output/logs"));
    }

    #[test]
    fn absolute_output_folder_is_kept() {
        let paths = PathSettings {
            output_folder: "/srv/renders".to_string(),
            ..PathSettings::default()
        };
        assert_eq!(paths.output_dir(Path::new("/videos/trip")), PathBuf::from("/srv/renders"));
    }

    #[test]
    fn every_section_has_a_distinct_table() {
        let names: std::collections::HashSet<_> =
            ConfigSection::ALL.iter().map(|s| s.table_name()).collect();
        assert_eq!(names.len(), ConfigSection::ALL.len());
    }
}
