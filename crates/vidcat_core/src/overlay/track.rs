//! Lazy per-second overlay line generator.

use chrono::TimeDelta;

use crate::models::{ConcatenationPlan, OverlayLine};
use crate::timeline::timecode::format_overlay_stamp;

/// Iterator over overlay lines for a plan.
///
/// For every segment and every whole second `s` in `[0, duration)` it
/// yields a line covering `[start + s, min(start + s + 1, end)]`. The
/// iterator borrows the plan and holds no other state, so a new one
/// always reproduces the same sequence.
pub struct OverlayLines<'a> {
    plan: &'a ConcatenationPlan,
    segment: usize,
    second: i64,
}

impl<'a> OverlayLines<'a> {
    pub fn new(plan: &'a ConcatenationPlan) -> Self {
        Self {
            plan,
            segment: 0,
            second: 0,
        }
    }
}

impl Iterator for OverlayLines<'_> {
    type Item = OverlayLine;

    fn next(&mut self) -> Option<OverlayLine> {
        loop {
            let segment = self.plan.segments.get(self.segment)?;

            // The source range length is exact; timeline offsets carry
            // accumulated rounding.
            if (self.second as f64) < segment.range.duration() {
                let s = self.second;
                self.second += 1;

                let start = segment.timeline_start + s as f64;
                let end = (start + 1.0).min(segment.timeline_end);
                let instant = segment
                    .wall_clock_start
                    .checked_add_signed(TimeDelta::try_seconds(s)?)?;

                return Some(OverlayLine {
                    start,
                    end,
                    text: format_overlay_stamp(&instant),
                });
            }

            self.segment += 1;
            self.second = 0;
        }
    }
}
