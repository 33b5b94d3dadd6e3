//! vidcat core - timeline assembly for directories of video clips.
//!
//! Probes clips, lays them out on one output timeline with wall-clock
//! chapters, writes the transcoder inputs and runs ffmpeg. No terminal
//! I/O lives here; the `vidcat` binary supplies prompts and flags.

pub mod artifacts;
pub mod config;
pub mod jobs;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod overlay;
pub mod probe;
pub mod publish;
pub mod timeline;
pub mod transcode;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
