//! Segment structures: cut ranges within a file and their placement
//! on the output timeline.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::media::SourceFile;

/// A cut range within one source file, in seconds from the file start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentSpec {
    pub start_offset: f64,
    pub end_offset: f64,
}

impl SegmentSpec {
    pub fn new(start_offset: f64, end_offset: f64) -> Self {
        Self {
            start_offset,
            end_offset,
        }
    }

    /// Range spanning an entire file.
    pub fn full(duration_seconds: f64) -> Self {
        Self::new(0.0, duration_seconds)
    }

    /// Length of the range in seconds.
    pub fn duration(&self) -> f64 {
        self.end_offset - self.start_offset
    }

    /// Whether an in-point trim marker is needed.
    ///
    /// A range starting at 0 is a pure copy from the file start, whether the
    /// 0 was written explicitly or defaulted.
    pub fn needs_inpoint(&self) -> bool {
        self.start_offset != 0.0
    }

    /// Whether an out-point trim marker is needed for a file of the given duration.
    pub fn needs_outpoint(&self, file_duration: f64) -> bool {
        self.end_offset != file_duration
    }

    /// Whether the range covers the whole file.
    pub fn is_full(&self, file_duration: f64) -> bool {
        !self.needs_inpoint() && !self.needs_outpoint(file_duration)
    }
}

/// A segment placed on the output timeline.
///
/// Created once by the plan builder and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct TimelineSegment {
    /// Zero-based position across the whole plan.
    pub index: usize,
    /// Owning source clip.
    pub source: Arc<SourceFile>,
    /// Cut range within the source.
    pub range: SegmentSpec,
    /// Start position on the output timeline, in seconds.
    pub timeline_start: f64,
    /// End position on the output timeline, in seconds.
    pub timeline_end: f64,
    /// Real-world instant of the first frame (adjusted).
    pub wall_clock_start: NaiveDateTime,
}

impl TimelineSegment {
    /// Length on the output timeline in seconds.
    pub fn duration(&self) -> f64 {
        self.timeline_end - self.timeline_start
    }

    /// 1-based number shown in chapter titles.
    pub fn number(&self) -> usize {
        self.index + 1
    }

    /// Two-digit segment label, e.g. "Segment 03".
    pub fn label(&self) -> String {
        format!("Segment {:02}", self.number())
    }
}
