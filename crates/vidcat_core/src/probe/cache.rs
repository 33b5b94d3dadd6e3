//! Single-flight probe cache.
//!
//! Every clip is probed at most once per run. Concurrent requests for
//! the same path wait on the first probe and share its outcome, which
//! includes failures: a clip that failed to probe is not retried.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Local};
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use rayon::prelude::*;

use super::ffprobe::{FfprobeProber, MediaProber};
use super::types::{ProbeError, ProbeResult};
use crate::models::{MediaInfo, SourceFile};

type Slot = Arc<OnceCell<ProbeResult<Arc<MediaInfo>>>>;

/// Probe cache keyed by path.
pub struct ProbeCache<P: MediaProber = FfprobeProber> {
    prober: P,
    slots: Mutex<HashMap<PathBuf, Slot>>,
    probes: AtomicUsize,
}

impl<P: MediaProber> ProbeCache<P> {
    pub fn new(prober: P) -> Self {
        Self {
            prober,
            slots: Mutex::new(HashMap::new()),
            probes: AtomicUsize::new(0),
        }
    }

    /// Probe a path, or return the cached outcome.
    pub fn get(&self, path: &Path) -> ProbeResult<Arc<MediaInfo>> {
        // The map lock is only held to find the slot; the probe itself
        // runs under the slot's OnceCell.
        let slot = {
            let mut slots = self.slots.lock();
            Arc::clone(slots.entry(path.to_path_buf()).or_default())
        };

        slot.get_or_init(|| {
            self.probes.fetch_add(1, Ordering::SeqCst);
            self.prober.probe(path).map(Arc::new)
        })
        .clone()
    }

    /// Warm the cache for a batch of paths in parallel.
    ///
    /// Errors are cached and surface on the next [`get`](Self::get).
    pub fn prefetch(&self, paths: &[PathBuf]) {
        tracing::debug!("Prefetching probe results for {} file(s)", paths.len());
        paths.par_iter().for_each(|path| {
            let _ = self.get(path);
        });
    }

    /// Number of probes actually executed.
    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    /// Number of distinct paths seen.
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SourceFile {
    /// Probe a clip through the cache and pair the result with its
    /// modification time in local wall-clock time.
    pub fn load<P: MediaProber>(path: &Path, cache: &ProbeCache<P>) -> ProbeResult<Self> {
        let media = cache.get(path)?;
        let modified = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .map_err(|e| ProbeError::failure(path, format!("Cannot read modification time: {}", e)))?;
        let local: DateTime<Local> = DateTime::from(modified);

        Ok(SourceFile::new(path, media, local.naive_local()))
    }
}

impl Default for ProbeCache<FfprobeProber> {
    fn default() -> Self {
        Self::new(FfprobeProber::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;
    use tempfile::tempdir;

    struct SlowProber {
        calls: AtomicUsize,
    }

    impl MediaProber for SlowProber {
        fn probe(&self, path: &Path) -> ProbeResult<MediaInfo> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(50));
            if path.to_string_lossy().contains("broken") {
                return Err(ProbeError::failure(path, "corrupt header"));
            }
            Ok(MediaInfo::new(10.0))
        }
    }

    fn cache() -> ProbeCache<SlowProber> {
        ProbeCache::new(SlowProber {
            calls: AtomicUsize::new(0),
        })
    }

    #[test]
    fn concurrent_requests_share_one_probe() {
        let cache = cache();
        let path = PathBuf::from("/clips/a.mp4");

        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    let info = cache.get(&path).unwrap();
                    assert_eq!(info.duration_seconds, 10.0);
                });
            }
        });

        assert_eq!(cache.probe_count(), 1);
        assert_eq!(cache.prober.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failures_are_cached() {
        let cache = cache();
        let path = PathBuf::from("/clips/broken.mp4");

        assert!(cache.get(&path).is_err());
        assert!(cache.get(&path).is_err());
        assert_eq!(cache.probe_count(), 1);
    }

    #[test]
    fn prefetch_probes_each_path_once() {
        let cache = cache();
        let paths: Vec<PathBuf> = (0..4).map(|i| PathBuf::from(format!("/clips/{i}.mp4"))).collect();

        cache.prefetch(&paths);
        for path in &paths {
            cache.get(path).unwrap();
        }

        assert_eq!(cache.probe_count(), 4);
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn load_reads_modification_time() {
        let dir = tempdir().unwrap();
        let clip = dir.path().join("clip.mp4");
        std::fs::write(&clip, b"data").unwrap();

        let cache = cache();
        let source = SourceFile::load(&clip, &cache).unwrap();
        assert_eq!(source.duration_seconds, 10.0);
        assert_eq!(source.path, clip);
    }

    #[test]
    fn load_propagates_probe_errors() {
        let cache = cache();
        let err = SourceFile::load(Path::new("/clips/broken.mp4"), &cache).unwrap_err();
        assert!(matches!(err, ProbeError::ProbeFailure { .. }));
    }
}
