//! Escaping for paths embedded in filter-graph strings.

use std::path::Path;

/// Escape a path for use inside a quoted filter argument.
///
/// Backslashes are doubled, single quotes become `'\\''` and colons are
/// escaped, since quotes and colons delimit filter options.
pub fn escape_filter_path(path: &str) -> String {
    path.replace('\\', "\\\\")
        .replace('\'', "'\\\\''")
        .replace(':', "\\:")
}

/// Build the `subtitles=` filter that burns in the overlay track.
///
/// Windows separators are normalised to `/` first.
pub fn subtitles_filter(track_path: &Path) -> String {
    let normalized = track_path.to_string_lossy().replace('\\', "/");
    format!("subtitles=\\'{}\\'", escape_filter_path(&normalized))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_colons_quotes_and_backslashes() {
        assert_eq!(escape_filter_path("C:/tmp/times.ass"), "C\\:/tmp/times.ass");
        assert_eq!(escape_filter_path("it's.ass"), "it'\\\\''s.ass");
        assert_eq!(escape_filter_path("a\\b"), "a\\\\b");
    }

    #[test]
    fn builds_quoted_subtitles_filter() {
        let filter = subtitles_filter(Path::new("C:\\clips\\tmp\\times.ass"));
        assert_eq!(filter, "subtitles=\\'C\\:/clips/tmp/times.ass\\'");
    }
}
