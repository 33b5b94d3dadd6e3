//! Concat demuxer list (`concat.txt`).
//!
//! ```text
//! file '/clips/a.mp4'
//! file '/clips/b [5-].mp4'
//! inpoint 00:00:05.000
//! ```

use crate::models::ConcatEntry;
use crate::timeline::timecode::format_vtt;

/// Quote a path for a `file` directive.
fn quote_path(path: &str) -> String {
    format!("'{}'", path.replace('\'', "'\\''"))
}

/// Render the concat list for a sequence of entries.
pub fn write_concat_list(entries: &[ConcatEntry]) -> String {
    let mut lines = Vec::with_capacity(entries.len());

    for entry in entries {
        lines.push(format!("file {}", quote_path(&entry.path.to_string_lossy())));
        if let Some(inpoint) = entry.inpoint {
            lines.push(format!("inpoint {}", format_vtt(inpoint)));
        }
        if let Some(outpoint) = entry.outpoint {
            lines.push(format!("outpoint {}", format_vtt(outpoint)));
        }
    }

    lines.join("\n")
}
