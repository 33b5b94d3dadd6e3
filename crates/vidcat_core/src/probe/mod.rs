//! Media probing.
//!
//! - **ffprobe**: the [`MediaProber`] seam and its ffprobe implementation
//! - **cache**: [`ProbeCache`], probing every path at most once per run
//!
//! # Usage
//!
//! ```ignore
//! use vidcat_core::probe::{FfprobeProber, ProbeCache};
//!
//! let cache = ProbeCache::new(FfprobeProber::new("ffprobe"));
//! cache.prefetch(&paths);
//! let source = SourceFile::load(&paths[0], &cache)?;
//! ```

mod cache;
mod ffprobe;
mod types;

pub use cache::ProbeCache;
pub use ffprobe::{FfprobeProber, MediaProber};
pub use types::{ProbeError, ProbeResult};
