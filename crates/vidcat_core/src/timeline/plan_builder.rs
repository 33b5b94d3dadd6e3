//! Concatenation plan builder.
//!
//! Walks the clips in caller order and, for each cut range, places a
//! segment on the output timeline and derives everything downstream
//! needs from it: the concat-list entry, the chapter marker and the
//! description line.
//!
//! # Layout
//!
//! ```text
//! clip a.mp4 (30s)      -> Segment 01   0s .. 30s
//! clip b [5-,-3].mp4    -> Segment 02  30s .. 30s + (dur - 5)
//!                       -> Segment 03  ...  .. + 3s
//! ```
//!
//! Segment numbering is global across the plan.

use std::sync::Arc;

use super::error::TimelineResult;
use super::segments::parse_segments;
use super::timecode::{format_clock, format_description_clock, format_offset, to_millis};
use super::wallclock::TimelineAdjuster;
use crate::models::{
    ChapterMarker, ConcatEntry, ConcatenationPlan, SegmentSpec, SourceFile, TimelineSegment,
};

/// One clip and the ranges to take from it.
#[derive(Debug, Clone)]
pub struct PlanInput {
    pub source: Arc<SourceFile>,
    pub ranges: Vec<SegmentSpec>,
}

impl PlanInput {
    pub fn new(source: Arc<SourceFile>, ranges: Vec<SegmentSpec>) -> Self {
        Self { source, ranges }
    }

    /// Take the ranges from the clip's file-name annotation.
    pub fn from_annotation(source: Arc<SourceFile>) -> TimelineResult<Self> {
        let ranges = parse_segments(&source.file_name(), source.duration_seconds)?;
        Ok(Self::new(source, ranges))
    }
}

/// Build the plan for an ordered list of clips.
pub fn build_plan(inputs: &[PlanInput], adjuster: &TimelineAdjuster) -> TimelineResult<ConcatenationPlan> {
    let mut plan = ConcatenationPlan::default();
    let mut t = 0.0_f64;
    let mut index = 0_usize;

    for input in inputs {
        let source = &input.source;

        for range in &input.ranges {
            let duration = range.duration();
            let wall_clock_start = adjuster.segment_start(source, range)?;

            let segment = TimelineSegment {
                index,
                source: Arc::clone(source),
                range: *range,
                timeline_start: t,
                timeline_end: t + duration,
                wall_clock_start,
            };

            plan.concat_entries.push(ConcatEntry {
                path: source.path.clone(),
                inpoint: range.needs_inpoint().then_some(range.start_offset),
                outpoint: range
                    .needs_outpoint(source.duration_seconds)
                    .then_some(range.end_offset),
            });

            let label = segment.label();
            plan.chapters.push(ChapterMarker {
                title: format!("{} [{}]", label, format_clock(&wall_clock_start)),
                start_ms: to_millis(segment.timeline_start),
                end_ms: to_millis(segment.timeline_end),
            });
            plan.description_lines.push(format!(
                "{} - {} [{}]",
                format_offset(segment.timeline_start),
                label,
                format_description_clock(&wall_clock_start)
            ));

            tracing::debug!(
                "{}: {} [{:.2}-{:.2}] at {:.2}s, starts {}",
                label,
                source.file_name(),
                range.start_offset,
                range.end_offset,
                segment.timeline_start,
                wall_clock_start
            );

            plan.segments.push(segment);
            t += duration;
            index += 1;
        }
    }

    plan.total_duration = t;
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MediaInfo;
    use chrono::{NaiveDate, NaiveDateTime};

    fn dt(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn clip(name: &str, duration: f64, end: NaiveDateTime) -> Arc<SourceFile> {
        Arc::new(SourceFile::new(
            format!("/clips/{}", name),
            Arc::new(MediaInfo::new(duration)),
            end,
        ))
    }

    fn sample_inputs() -> Vec<PlanInput> {
        vec![
            PlanInput::from_annotation(clip("a.mp4", 30.0, dt(14, 0, 30))).unwrap(),
            PlanInput::from_annotation(clip("b [10-,-20].mp4", 30.0, dt(15, 1, 0))).unwrap(),
            PlanInput::from_annotation(clip("c [2.5-4].mp4", 12.0, dt(16, 0, 12))).unwrap(),
        ]
    }

    #[test]
    fn segments_are_contiguous_from_zero() {
        let plan = build_plan(&sample_inputs(), &TimelineAdjuster::default()).unwrap();
        assert_eq!(plan.len(), 4);
        assert_eq!(plan.segments[0].timeline_start, 0.0);
        for pair in plan.segments.windows(2) {
            assert_eq!(pair[0].timeline_end, pair[1].timeline_start);
            assert!(pair[1].timeline_start > pair[0].timeline_start);
        }
        assert_eq!(plan.total_duration, plan.segments.last().unwrap().timeline_end);
    }

    #[test]
    fn total_duration_is_sum_of_ranges() {
        let inputs = sample_inputs();
        let plan = build_plan(&inputs, &TimelineAdjuster::default()).unwrap();
        let expected: f64 = inputs
            .iter()
            .flat_map(|i| i.ranges.iter())
            .map(|r| r.duration())
            .sum();
        assert!((plan.total_duration - expected).abs() < 1e-9);

        let mut reversed = inputs.clone();
        reversed.reverse();
        let reversed_plan = build_plan(&reversed, &TimelineAdjuster::default()).unwrap();
        assert!((reversed_plan.total_duration - plan.total_duration).abs() < 1e-9);
    }

    #[test]
    fn trim_markers_only_where_bounds_differ() {
        let plan = build_plan(&sample_inputs(), &TimelineAdjuster::default()).unwrap();
        let markers: Vec<(Option<f64>, Option<f64>)> = plan
            .concat_entries
            .iter()
            .map(|e| (e.inpoint, e.outpoint))
            .collect();
        assert_eq!(
            markers,
            vec![
                (None, None),
                (Some(10.0), None),
                (None, Some(20.0)),
                (Some(2.5), Some(4.0)),
            ]
        );
    }

    #[test]
    fn chapters_and_descriptions_are_numbered_globally() {
        let plan = build_plan(&sample_inputs(), &TimelineAdjuster::default()).unwrap();

        let titles: Vec<&str> = plan.chapters.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Segment 01 [02:00:00 PM]",
                "Segment 02 [03:00:40 PM]",
                "Segment 03 [03:00:30 PM]",
                "Segment 04 [04:00:02 PM]",
            ]
        );
        assert_eq!(plan.chapters[1].start_ms, 30_000);
        assert_eq!(plan.chapters[1].end_ms, 50_000);

        assert_eq!(plan.description_lines[0], "00:00 - Segment 01 [2\u{A789}00\u{A789}00 PM]");
        assert_eq!(plan.description_lines[2], "00:50 - Segment 03 [3\u{A789}00\u{A789}30 PM]");
        assert_eq!(plan.description_lines.len(), plan.len());
        for (i, segment) in plan.segments.iter().enumerate() {
            assert_eq!(segment.number(), i + 1);
        }
    }

    #[test]
    fn malformed_annotation_fails() {
        let result = PlanInput::from_annotation(clip("d [x-1].mp4", 5.0, dt(9, 0, 0)));
        assert!(result.is_ok(), "non-range brackets are treated as plain text");

        let result = PlanInput::from_annotation(clip("d [1..2-3].mp4", 5.0, dt(9, 0, 0)));
        assert!(result.is_err());
    }
}
