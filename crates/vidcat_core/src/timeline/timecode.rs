//! Timecode and wall-clock formatting helpers.
//!
//! Output timeline positions are kept as `f64` seconds and only rounded
//! when rendered:
//!
//! | Use                    | Format            | Example        |
//! |------------------------|-------------------|----------------|
//! | concat in/out points   | `HH:MM:SS.mmm`    | `00:01:05.250` |
//! | ASS overlay events     | `H:MM:SS.cc`      | `0:01:05.25`   |
//! | description offsets    | `MM:SS` / `H:MM:SS` | `01:05`      |

use chrono::{NaiveDateTime, TimeDelta};

/// Modifier letter colon, used inside description times so that the
/// time of day is not mistaken for a chapter timestamp.
pub const DESCRIPTION_TIME_SEPARATOR: char = '\u{A789}';

/// Convert seconds to a millisecond-resolution delta.
pub fn seconds_to_delta(seconds: f64) -> TimeDelta {
    TimeDelta::milliseconds(to_millis(seconds))
}

/// Round seconds to whole milliseconds.
pub fn to_millis(seconds: f64) -> i64 {
    (seconds * 1000.0).round() as i64
}

/// Format seconds as `HH:MM:SS.mmm`.
pub fn format_vtt(seconds: f64) -> String {
    let ms = to_millis(seconds).max(0);
    let millis = ms % 1000;
    let total_secs = ms / 1000;
    let secs = total_secs % 60;
    let mins = (total_secs / 60) % 60;
    let hours = total_secs / 3600;
    format!("{:02}:{:02}:{:02}.{:03}", hours, mins, secs, millis)
}

/// Format seconds as ASS `H:MM:SS.cc` (centiseconds).
pub fn format_ass(seconds: f64) -> String {
    let cs = (seconds * 100.0).round().max(0.0) as i64;
    let centis = cs % 100;
    let total_secs = cs / 100;
    let secs = total_secs % 60;
    let mins = (total_secs / 60) % 60;
    let hours = total_secs / 3600;
    format!("{}:{:02}:{:02}.{:02}", hours, mins, secs, centis)
}

/// Format a timeline offset for description lines.
///
/// Rounds to whole seconds; the hour field is dropped below one hour.
pub fn format_offset(seconds: f64) -> String {
    let total = seconds.round().max(0.0) as i64;
    let secs = total % 60;
    let mins = (total / 60) % 60;
    let hours = total / 3600;
    if hours == 0 {
        format!("{:02}:{:02}", mins, secs)
    } else {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    }
}

/// 12-hour time used in chapter titles, e.g. `03:04:05 PM`.
pub fn format_clock(instant: &NaiveDateTime) -> String {
    instant.format("%I:%M:%S %p").to_string()
}

/// 12-hour time for description lines, e.g. `3꞉04꞉05 PM`.
pub fn format_description_clock(instant: &NaiveDateTime) -> String {
    let sep = DESCRIPTION_TIME_SEPARATOR;
    instant
        .format(&format!("%-I{sep}%M{sep}%S %p"))
        .to_string()
}

/// Date and time shown in the overlay, e.g. `31/01/2024 03:04:05 PM`.
pub fn format_overlay_stamp(instant: &NaiveDateTime) -> String {
    instant.format("%d/%m/%Y %I:%M:%S %p").to_string()
}
