//! Directory discovery.
//!
//! A directory becomes one run: its clips (by extension, sorted by file
//! name), an optional thumbnail image and a run name taken from the
//! directory itself.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::DiscoverySettings;

/// One input directory, ready to process.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryJob {
    /// Run name (directory base name).
    pub name: String,
    /// Absolute directory path.
    pub dir: PathBuf,
    /// Clips in processing order.
    pub videos: Vec<PathBuf>,
    /// First image in the directory, used as the upload thumbnail.
    pub thumbnail: Option<PathBuf>,
}

impl DirectoryJob {
    /// File name of the concatenated output.
    pub fn output_file_name(&self, test_mode: bool) -> String {
        if test_mode {
            format!("{}-test.mkv", self.name)
        } else {
            format!("{}.mkv", self.name)
        }
    }

    pub fn has_videos(&self) -> bool {
        !self.videos.is_empty()
    }
}

/// Scan a directory for clips and a thumbnail.
///
/// Only regular files directly inside `dir` are considered. Extension
/// matching is case-insensitive.
pub fn discover_directory(dir: &Path, settings: &DiscoverySettings) -> io::Result<DirectoryJob> {
    let dir = dir.canonicalize()?;

    let mut videos = Vec::new();
    let mut images = Vec::new();

    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let path = entry.path();
        if has_extension(&path, &settings.video_extensions) {
            videos.push(path);
        } else if has_extension(&path, &settings.thumbnail_extensions) {
            images.push(path);
        }
    }

    videos.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "vidcat".to_string());

    tracing::debug!(
        "Discovered {} clip(s) in {} (thumbnail: {})",
        videos.len(),
        dir.display(),
        images.first().map(|p| p.display().to_string()).unwrap_or_else(|| "none".into())
    );

    Ok(DirectoryJob {
        name,
        dir,
        videos,
        thumbnail: images.into_iter().next(),
    })
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .map(|ext| extensions.iter().any(|known| known.eq_ignore_ascii_case(&ext)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"x").unwrap();
    }

    #[test]
    fn finds_sorted_clips_and_first_thumbnail() {
        let root = tempdir().unwrap();
        let dir = root.path().join("Beach Day");
        fs::create_dir(&dir).unwrap();
        touch(&dir, "b.MP4");
        touch(&dir, "a [5-].mov.mkv");
        touch(&dir, "c.qt");
        touch(&dir, "notes.txt");
        touch(&dir, "z.png");
        touch(&dir, "cover.JPG");
        fs::create_dir(dir.join("tmp.mp4")).unwrap();

        let job = discover_directory(&dir, &DiscoverySettings::default()).unwrap();

        let names: Vec<_> = job
            .videos
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a [5-].mov.mkv", "b.MP4", "c.qt"]);
        assert_eq!(job.thumbnail.unwrap().file_name().unwrap(), "cover.JPG");
        assert_eq!(job.name, "Beach Day");
        assert!(job.dir.is_absolute());
    }

    #[test]
    fn output_name_reflects_test_mode() {
        let job = DirectoryJob {
            name: "trip".to_string(),
            dir: PathBuf::from("/v/trip"),
            videos: Vec::new(),
            thumbnail: None,
        };
        assert_eq!(job.output_file_name(false), "trip.mkv");
        assert_eq!(job.output_file_name(true), "trip-test.mkv");
        assert!(!job.has_videos());
    }

    #[test]
    fn empty_directory_has_no_videos() {
        let dir = tempdir().unwrap();
        let job = discover_directory(dir.path(), &DiscoverySettings::default()).unwrap();
        assert!(!job.has_videos());
        assert!(job.thumbnail.is_none());
    }

    #[test]
    fn missing_directory_is_an_error() {
        assert!(discover_directory(Path::new("/nonexistent/dir"), &DiscoverySettings::default()).is_err());
    }
}
