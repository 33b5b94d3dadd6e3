//! The concatenation plan and the entries derived from it.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::segment::TimelineSegment;
use crate::overlay::OverlayLines;

/// One instruction for the concat demuxer: which file, and optional trims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcatEntry {
    /// Absolute path to the source file.
    pub path: PathBuf,
    /// In-point in seconds (omitted when the range starts at 0).
    pub inpoint: Option<f64>,
    /// Out-point in seconds (omitted when the range ends at the file end).
    pub outpoint: Option<f64>,
}

/// A named chapter on the output timeline, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterMarker {
    pub title: String,
    pub start_ms: i64,
    pub end_ms: i64,
}

/// One overlay subtitle event covering at most one second of output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayLine {
    /// Start on the output timeline, in seconds.
    pub start: f64,
    /// End on the output timeline, in seconds.
    pub end: f64,
    /// Formatted wall-clock instant.
    pub text: String,
}

/// Ordered, time-accurate plan for concatenating a directory of clips.
#[derive(Debug, Clone, Default)]
pub struct ConcatenationPlan {
    /// Segments in output order.
    pub segments: Vec<TimelineSegment>,
    /// Concat-list entries, one per segment.
    pub concat_entries: Vec<ConcatEntry>,
    /// Chapter markers, one per segment.
    pub chapters: Vec<ChapterMarker>,
    /// Human-readable description lines, one per segment.
    pub description_lines: Vec<String>,
    /// Total output duration in seconds.
    pub total_duration: f64,
}

impl ConcatenationPlan {
    /// Number of segments in the plan.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the plan has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Description text (one line per segment).
    pub fn description(&self) -> String {
        self.description_lines.join("\n")
    }

    /// Lazily generate the per-second overlay lines.
    ///
    /// Each call starts a fresh pass over the plan, so the output is
    /// identical every time.
    pub fn overlay_lines(&self) -> OverlayLines<'_> {
        OverlayLines::new(self)
    }
}
