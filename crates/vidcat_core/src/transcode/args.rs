//! ffmpeg argument assembly.
//!
//! Builds the full argument list for one concatenation run from the
//! encode settings and the artifact paths. Pure; nothing is executed.
//!
//! # Input order
//!
//! ```text
//! 0: concat list          (-f concat -safe 0 -i concat.txt)
//! 1: overlay track        (soft overlay only)
//! n: chapter metadata     (-i meta.txt -map_metadata n)
//! ```

use std::path::{Path, PathBuf};

use crate::artifacts::ArtifactPaths;
use crate::config::EncodeSettings;
use crate::models::OverlayMode;
use crate::overlay::subtitles_filter;

/// Loudness normalization applied to every output.
pub const AUDIO_NORMALIZATION: &str = "dynaudnorm=f=500:p=0.9:m=8.0:g=7";

/// Output length in test mode, in seconds.
pub const TEST_MODE_SECONDS: u32 = 60;

/// Ordered ffmpeg options followed by the output path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArgList {
    entries: Vec<(String, Option<String>)>,
    output: Option<PathBuf>,
}

impl ArgList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bare flag such as `-y`.
    pub fn flag(&mut self, name: impl Into<String>) -> &mut Self {
        self.entries.push((name.into(), None));
        self
    }

    /// Add a flag with a value.
    pub fn opt(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.push((name.into(), Some(value.into())));
        self
    }

    /// Set the output path, always emitted last.
    pub fn output(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.output = Some(path.into());
        self
    }

    pub fn entries(&self) -> &[(String, Option<String>)] {
        &self.entries
    }

    /// Value of the first occurrence of `name`.
    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(flag, _)| flag == name)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(flag, _)| flag == name)
    }

    /// Flatten into command-line tokens.
    pub fn to_tokens(&self) -> Vec<String> {
        let mut tokens = Vec::with_capacity(self.entries.len() * 2 + 1);
        for (flag, value) in &self.entries {
            tokens.push(flag.clone());
            if let Some(value) = value {
                tokens.push(value.clone());
            }
        }
        if let Some(ref output) = self.output {
            tokens.push(output.to_string_lossy().to_string());
        }
        tokens
    }

    pub fn into_tokens(self) -> Vec<String> {
        self.to_tokens()
    }
}

/// Split a comma-separated codec option string into flag/value pairs.
///
/// `key=value` becomes `-key value` (split at the first `=`); an item
/// without `=` becomes a bare `-key`. Blank items are skipped.
pub fn parse_codec_options(options: &str) -> Vec<(String, Option<String>)> {
    options
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| match item.split_once('=') {
            Some((key, value)) => (format!("-{}", key.trim()), Some(value.trim().to_string())),
            None => (format!("-{}", item), None),
        })
        .collect()
}

fn push_codec_options(args: &mut ArgList, options: Option<&str>) {
    for (flag, value) in parse_codec_options(options.unwrap_or("")) {
        match value {
            Some(value) => args.opt(flag, value),
            None => args.flag(flag),
        };
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Assemble the ffmpeg arguments for one run.
pub fn build_transcode_args(
    encode: &EncodeSettings,
    overlay: OverlayMode,
    artifacts: &ArtifactPaths,
    output: &Path,
) -> ArgList {
    let mut args = ArgList::new();
    let mut input_count = 0;

    args.opt("-f", "concat")
        .opt("-safe", "0")
        .opt("-i", artifacts.concat_list.to_string_lossy());
    input_count += 1;

    let overlay_track = artifacts.overlay_track.as_deref().filter(|_| overlay.is_enabled());

    if let (OverlayMode::Soft, Some(track)) = (overlay, overlay_track) {
        args.opt("-i", track.to_string_lossy());
        input_count += 1;
    }

    args.opt("-i", artifacts.metadata.to_string_lossy())
        .opt("-map_metadata", input_count.to_string());

    let mut video_filters = Vec::new();
    if let (OverlayMode::Hard, Some(track)) = (overlay, overlay_track) {
        video_filters.push(subtitles_filter(track));
    }
    let scale = encode.scale.trim();
    if !scale.is_empty() {
        video_filters.push(format!("scale={}", scale));
    }
    if !video_filters.is_empty() {
        args.opt("-vf", video_filters.join(","));
    }

    args.opt("-af", AUDIO_NORMALIZATION);

    args.opt("-c:v", &encode.video_codec);
    if let Some(preset) = non_empty(encode.video_preset.as_ref()) {
        args.opt("-preset:v", preset);
    }
    push_codec_options(&mut args, encode.video_options.as_deref());

    args.opt("-c:a", &encode.audio_codec);
    if let Some(preset) = non_empty(encode.audio_preset.as_ref()) {
        args.opt("-preset:a", preset);
    }
    push_codec_options(&mut args, encode.audio_options.as_deref());

    if encode.test_mode {
        args.opt("-t", TEST_MODE_SECONDS.to_string());
    }

    args.opt("-f", "matroska").flag("-y").output(output);
    args
}

/// Format tokens one option per line, for logs.
pub fn format_tokens_pretty(tokens: &[String]) -> String {
    let mut result = String::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];
        let is_last = i + 1 == tokens.len();

        if token.starts_with('-') && !is_last && !tokens[i + 1].starts_with('-') {
            result.push_str(&format!("{} {}", token, tokens[i + 1]));
            i += 2;
        } else {
            result.push_str(token);
            i += 1;
        }

        if i < tokens.len() {
            result.push_str(" \\\n");
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifacts(with_overlay: bool) -> ArtifactPaths {
        ArtifactPaths {
            concat_list: PathBuf::from("/v/tmp/concat.txt"),
            metadata: PathBuf::from("/v/tmp/meta.txt"),
            overlay_track: with_overlay.then(|| PathBuf::from("/v/tmp/times.ass")),
        }
    }

    fn tokens(encode: &EncodeSettings, overlay: OverlayMode) -> Vec<String> {
        build_transcode_args(encode, overlay, &artifacts(overlay.is_enabled()), Path::new("/v/out/trip.mkv"))
            .into_tokens()
    }

    #[test]
    fn default_settings_produce_the_base_command() {
        let got = tokens(&EncodeSettings::default(), OverlayMode::Off);
        let expected: Vec<String> = [
            "-f", "concat", "-safe", "0", "-i", "/v/tmp/concat.txt",
            "-i", "/v/tmp/meta.txt", "-map_metadata", "1",
            "-af", AUDIO_NORMALIZATION,
            "-c:v", "copy",
            "-c:a", "aac", "-b:a", "160k",
            "-f", "matroska", "-y", "/v/out/trip.mkv",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn soft_overlay_shifts_metadata_input() {
        let args = build_transcode_args(
            &EncodeSettings::default(),
            OverlayMode::Soft,
            &artifacts(true),
            Path::new("/v/out/trip.mkv"),
        );
        let tokens = args.to_tokens();
        assert_eq!(&tokens[6..8], ["-i", "/v/tmp/times.ass"]);
        assert_eq!(args.value_of("-map_metadata"), Some("2"));
        assert!(!args.contains("-vf"));
    }

    #[test]
    fn hard_overlay_and_scale_share_one_filter_chain() {
        let encode = EncodeSettings {
            scale: "1280:-2".to_string(),
            ..EncodeSettings::default()
        };
        let args = build_transcode_args(&encode, OverlayMode::Hard, &artifacts(true), Path::new("/o.mkv"));

        assert_eq!(
            args.value_of("-vf"),
            Some("subtitles=\\'/v/tmp/times.ass\\',scale=1280:-2")
        );
        assert_eq!(args.value_of("-map_metadata"), Some("1"));
    }

    #[test]
    fn codec_presets_options_and_test_mode() {
        let encode = EncodeSettings {
            video_codec: "libx264".to_string(),
            video_preset: Some("slow".to_string()),
            video_options: Some("crf=20, tune=film,,faststart".to_string()),
            audio_preset: Some("  ".to_string()),
            test_mode: true,
            ..EncodeSettings::default()
        };
        let got = tokens(&encode, OverlayMode::Off);
        let joined = got.join(" ");

        assert!(joined.contains("-c:v libx264 -preset:v slow -crf 20 -tune film -faststart -c:a aac"));
        assert!(!joined.contains("-preset:a"));
        assert!(joined.contains("-t 60 -f matroska -y /v/out/trip.mkv"));
    }

    #[test]
    fn parses_codec_options() {
        assert_eq!(
            parse_codec_options("b:a=160k,ar=48000"),
            vec![
                ("-b:a".to_string(), Some("160k".to_string())),
                ("-ar".to_string(), Some("48000".to_string())),
            ]
        );
        assert_eq!(
            parse_codec_options("x264-params=keyint=60"),
            vec![("-x264-params".to_string(), Some("keyint=60".to_string()))]
        );
        assert!(parse_codec_options(" , ").is_empty());
    }

    #[test]
    fn pretty_format_puts_one_option_per_line() {
        let tokens: Vec<String> = ["-f", "concat", "-y", "/o.mkv"].iter().map(|s| s.to_string()).collect();
        assert_eq!(format_tokens_pretty(&tokens), "-f concat \\\n-y /o.mkv");
    }
}
