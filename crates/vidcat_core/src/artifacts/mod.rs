//! Scratch artifacts consumed by the transcoder.
//!
//! A plan is written out as:
//!
//! - `concat.txt`: the concat demuxer list with trim points
//! - `meta.txt`: chapter markers in ffmetadata format
//! - `times.ass`: the per-second overlay track, only when overlays are on
//!
//! All three are plain text and regenerate identically from the same plan.

mod concat_list;
mod ffmetadata;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::models::{ConcatenationPlan, OverlayMode};
use crate::overlay::write_overlay_track;

pub use concat_list::write_concat_list;
pub use ffmetadata::{escape_metadata_value, write_ffmetadata, FFMETADATA_HEADER};

pub const CONCAT_LIST_NAME: &str = "concat.txt";
pub const METADATA_NAME: &str = "meta.txt";
pub const OVERLAY_TRACK_NAME: &str = "times.ass";

/// Locations of the artifacts written for one plan.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPaths {
    pub concat_list: PathBuf,
    pub metadata: PathBuf,
    /// Present only when an overlay was requested.
    pub overlay_track: Option<PathBuf>,
}

/// Write the artifacts for a plan into `work_dir`.
pub fn write_artifacts(
    plan: &ConcatenationPlan,
    work_dir: &Path,
    overlay: OverlayMode,
) -> io::Result<ArtifactPaths> {
    fs::create_dir_all(work_dir)?;

    let concat_list = work_dir.join(CONCAT_LIST_NAME);
    fs::write(&concat_list, write_concat_list(&plan.concat_entries))?;

    let metadata = work_dir.join(METADATA_NAME);
    fs::write(&metadata, write_ffmetadata(&plan.chapters))?;

    let overlay_track = if overlay.is_enabled() {
        let path = work_dir.join(OVERLAY_TRACK_NAME);
        fs::write(&path, write_overlay_track(plan))?;
        Some(path)
    } else {
        None
    };

    Ok(ArtifactPaths {
        concat_list,
        metadata,
        overlay_track,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaInfo, SourceFile};
    use crate::timeline::{build_plan, PlanInput, TimelineAdjuster};
    use chrono::NaiveDate;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn plan() -> ConcatenationPlan {
        let end = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();
        let clip = Arc::new(SourceFile::new(
            "/clips/walk [2-5].mp4",
            Arc::new(MediaInfo::new(10.0)),
            end,
        ));
        build_plan(
            &[PlanInput::from_annotation(clip).unwrap()],
            &TimelineAdjuster::default(),
        )
        .unwrap()
    }

    #[test]
    fn writes_concat_and_metadata_without_overlay() {
        let dir = tempdir().unwrap();
        let paths = write_artifacts(&plan(), dir.path(), OverlayMode::Off).unwrap();

        assert!(paths.overlay_track.is_none());
        assert!(!dir.path().join(OVERLAY_TRACK_NAME).exists());

        let concat = fs::read_to_string(&paths.concat_list).unwrap();
        assert_eq!(
            concat,
            "file '/clips/walk [2-5].mp4'\ninpoint 00:00:02.000\noutpoint 00:00:05.000"
        );

        let meta = fs::read_to_string(&paths.metadata).unwrap();
        assert!(meta.contains("START=0\nEND=3000\n"));
    }

    #[test]
    fn writes_overlay_track_when_enabled() {
        let dir = tempdir().unwrap();
        let paths = write_artifacts(&plan(), dir.path(), OverlayMode::Soft).unwrap();

        let track = fs::read_to_string(paths.overlay_track.unwrap()).unwrap();
        assert_eq!(track.lines().filter(|l| l.starts_with("Dialogue:")).count(), 3);
    }

    #[test]
    fn rewriting_is_deterministic() {
        let dir = tempdir().unwrap();
        let plan = plan();
        let first = write_artifacts(&plan, dir.path(), OverlayMode::Hard).unwrap();
        let a = fs::read_to_string(&first.concat_list).unwrap();
        write_artifacts(&plan, dir.path(), OverlayMode::Hard).unwrap();
        let b = fs::read_to_string(&first.concat_list).unwrap();
        assert_eq!(a, b);
    }
}
