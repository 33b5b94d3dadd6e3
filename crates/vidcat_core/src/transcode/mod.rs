//! Transcoder hand-off.
//!
//! - **args**: typed [`ArgList`] builder and the ffmpeg argument assembly
//! - **runner**: spawning ffmpeg and streaming its output to the run log

mod args;
mod runner;

pub use args::{
    build_transcode_args, format_tokens_pretty, parse_codec_options, ArgList,
    AUDIO_NORMALIZATION, TEST_MODE_SECONDS,
};
pub use runner::{run_transcoder, TranscodeRun};
