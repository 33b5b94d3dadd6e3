//! Data models for vidcat.
//!
//! This module contains the core data structures shared by every stage:
//! - Enums for overlay mode and stream kinds
//! - Media structures (probe results, source files)
//! - Segment structures (cut ranges, placed timeline segments)
//! - The concatenation plan and its derived entries

mod enums;
mod media;
mod plan;
mod segment;

pub use enums::{OverlayMode, StreamKind};
pub use media::{MediaInfo, SourceFile, StreamInfo};
pub use plan::{ChapterMarker, ConcatEntry, ConcatenationPlan, OverlayLine};
pub use segment::{SegmentSpec, TimelineSegment};
