//! Chapter metadata in ffmetadata format (`meta.txt`).

use crate::models::ChapterMarker;

/// First line of every ffmetadata file.
pub const FFMETADATA_HEADER: &str = ";FFMETADATA1";

/// Backslash-escape characters that are significant in ffmetadata values.
pub fn escape_metadata_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '=' | ';' | '#' | '\\' | '\n') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Render chapter markers as an ffmetadata document.
pub fn write_ffmetadata(chapters: &[ChapterMarker]) -> String {
    let mut out = String::from(FFMETADATA_HEADER);
    out.push('\n');

    for chapter in chapters {
        out.push_str("[CHAPTER]\n");
        out.push_str("TIMEBASE=1/1000\n");
        out.push_str(&format!("START={}\n", chapter.start_ms));
        out.push_str(&format!("END={}\n", chapter.end_ms));
        out.push_str(&format!("title={}\n", escape_metadata_value(&chapter.title)));
        out.push('\n');
    }

    out
}
