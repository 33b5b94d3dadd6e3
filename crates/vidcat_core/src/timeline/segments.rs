//! Segment annotation parser.
//!
//! A clip can be cut into several ranges by putting a bracketed list of
//! `start-end` second ranges anywhere in its file name:
//!
//! ```text
//! hike [10-,-20].mp4    ->  [10, end], [0, 20]
//! hike [2.5-7.25].mp4   ->  [2.5, 7.25]
//! hike.mp4              ->  [0, end]
//! ```
//!
//! A missing start defaults to 0 and a missing end to the clip duration.
//! Ranges are kept in the order they are written; overlap between ranges
//! is not checked.

use super::error::{TimelineError, TimelineResult};
use crate::models::SegmentSpec;

/// Characters allowed inside a range annotation.
fn is_annotation_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, ',' | '-' | '.' | ' ' | '\t')
}

/// Find the first bracketed group that looks like a range list.
fn find_annotation(file_name: &str) -> Option<&str> {
    let mut rest = file_name;
    while let Some(open) = rest.find('[') {
        let after = &rest[open + 1..];
        let close = after.find(']')?;
        let inner = &after[..close];
        if !inner.trim().is_empty() && inner.contains('-') && inner.chars().all(is_annotation_char) {
            return Some(inner);
        }
        rest = &after[close + 1..];
    }
    None
}

/// Parse the cut ranges for a clip.
///
/// Returns a single full-length range when the name carries no annotation.
pub fn parse_segments(file_name: &str, duration: f64) -> TimelineResult<Vec<SegmentSpec>> {
    let Some(annotation) = find_annotation(file_name) else {
        return Ok(vec![SegmentSpec::full(duration)]);
    };

    annotation
        .split(',')
        .map(|token| parse_range(file_name, token.trim(), duration))
        .collect()
}

/// Parse a single `start-end` token.
fn parse_range(file_name: &str, token: &str, duration: f64) -> TimelineResult<SegmentSpec> {
    let mut bounds = token.split('-');
    let (Some(start), Some(end), None) = (bounds.next(), bounds.next(), bounds.next()) else {
        return Err(TimelineError::malformed(
            file_name,
            token,
            "expected a single 'start-end' range",
        ));
    };

    let start = parse_bound(file_name, token, start, "start")?.unwrap_or(0.0);
    let mut end = parse_bound(file_name, token, end, "end")?.unwrap_or(duration);

    if end > duration {
        tracing::warn!(
            "Range '{}' in '{}' ends after the clip ({}s), clamping",
            token,
            file_name,
            duration
        );
        end = duration;
    }

    if start >= end {
        return Err(TimelineError::malformed(
            file_name,
            token,
            format!("start {} is not before end {}", start, end),
        ));
    }

    Ok(SegmentSpec::new(start, end))
}

/// Parse one bound; empty means "use the default".
fn parse_bound(file_name: &str, token: &str, raw: &str, which: &str) -> TimelineResult<Option<f64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| TimelineError::malformed(file_name, token, format!("{} '{}' is not a number", which, raw)))
}
