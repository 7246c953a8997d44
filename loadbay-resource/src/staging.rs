//! Process-local staging storage for module payloads.
//!
//! The staging area owns the scratch directory and the serial counter.
//! Scratch file names derive from the serial, so concurrent constructions
//! never collide without any extra locking. The counter is seeded from the
//! wall clock so serials from a restarted process still sort after earlier
//! runs'.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, warn};

use crate::config::StagingConfig;
use crate::error::ResourceError;

/// Chunk size for payload copies.
const COPY_BUFFER_SIZE: usize = 16 * 1024;

/// Owns the scratch directory and serial counter for resource construction.
#[derive(Debug)]
pub struct StagingArea {
    root: PathBuf,
    serial_counter: AtomicU64,
}

impl StagingArea {
    /// Opens a staging area rooted at the given directory, creating it if
    /// needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ResourceError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Ok(Self {
            root,
            serial_counter: AtomicU64::new(seed),
        })
    }

    /// Opens the staging area configured in `~/.loadbay/staging.toml`.
    pub fn load() -> Result<Self, ResourceError> {
        Self::open(StagingConfig::load().root)
    }

    /// Opens the staging area configured at an explicit config path.
    pub fn load_from(config_path: &Path) -> Result<Self, ResourceError> {
        Self::open(StagingConfig::load_from(config_path).root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Hands out the next serial number. Strictly increasing, never
    /// reused, safe under concurrent callers.
    pub fn next_serial(&self) -> u64 {
        self.serial_counter.fetch_add(1, Ordering::SeqCst)
    }

    pub(crate) fn data_file_path(&self, serial: u64) -> PathBuf {
        self.root.join(format!("resource.{serial}"))
    }

    /// Copies a payload stream into the scratch file for `serial`. The
    /// partial file is removed if the copy fails.
    pub(crate) fn stage<R: Read>(&self, serial: u64, mut data: R) -> Result<PathBuf, ResourceError> {
        let path = self.data_file_path(serial);
        debug!(path = %path.display(), "copying payload to local storage");
        if let Err(e) = copy_stream(&mut data, &path) {
            remove_if_exists(&path);
            return Err(e.into());
        }
        Ok(path)
    }
}

fn copy_stream<R: Read>(data: &mut R, path: &Path) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    let mut buffer = [0u8; COPY_BUFFER_SIZE];
    loop {
        let count = data.read(&mut buffer)?;
        if count == 0 {
            break;
        }
        out.write_all(&buffer[..count])?;
    }
    out.flush()
}

/// Best-effort delete of a scratch file: a no-op if it is already gone,
/// and deletion failures are swallowed since an orphaned scratch file is
/// recoverable while a cleanup error is not actionable by callers.
pub(crate) fn remove_if_exists(path: &Path) {
    if path.exists() {
        debug!(path = %path.display(), "deleting local storage file");
        if let Err(e) = fs::remove_file(path) {
            warn!(path = %path.display(), "failed to delete local storage file: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn test_area() -> (tempfile::TempDir, StagingArea) {
        let dir = tempfile::tempdir().unwrap();
        let area = StagingArea::open(dir.path().join("staging")).unwrap();
        (dir, area)
    }

    #[test]
    fn open_creates_root() {
        let (_dir, area) = test_area();
        assert!(area.root().is_dir());
    }

    #[test]
    fn serials_are_strictly_increasing() {
        let (_dir, area) = test_area();
        let a = area.next_serial();
        let b = area.next_serial();
        let c = area.next_serial();
        assert!(a < b && b < c);
    }

    #[test]
    fn serials_unique_under_concurrency() {
        let (_dir, area) = test_area();
        let area = Arc::new(area);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let area = Arc::clone(&area);
                std::thread::spawn(move || (0..100).map(|_| area.next_serial()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for serial in handle.join().unwrap() {
                assert!(seen.insert(serial), "serial {serial} handed out twice");
            }
        }
        assert_eq!(seen.len(), 800);
    }

    #[test]
    fn independent_areas_have_independent_counters() {
        let (_dir_a, a) = test_area();
        let (_dir_b, b) = test_area();
        // Drains one counter; the other is unaffected beyond its seed.
        let before = b.next_serial();
        for _ in 0..50 {
            a.next_serial();
        }
        assert_eq!(b.next_serial(), before + 1);
    }

    #[test]
    fn stage_copies_bytes() {
        let (_dir, area) = test_area();
        let serial = area.next_serial();
        let path = area.stage(serial, &b"some payload"[..]).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"some payload");
    }

    #[test]
    fn stage_handles_payloads_larger_than_one_chunk() {
        let (_dir, area) = test_area();
        let payload = vec![0xabu8; COPY_BUFFER_SIZE * 3 + 17];
        let serial = area.next_serial();
        let path = area.stage(serial, payload.as_slice()).unwrap();
        assert_eq!(fs::read(&path).unwrap(), payload);
    }

    #[test]
    fn stage_failure_leaves_no_partial_file() {
        struct FailingReader;
        impl Read for FailingReader {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("producer went away"))
            }
        }

        let (_dir, area) = test_area();
        let serial = area.next_serial();
        let result = area.stage(serial, FailingReader);
        assert!(matches!(result, Err(ResourceError::Storage(_))));
        assert!(!area.data_file_path(serial).exists());
    }

    #[test]
    fn remove_if_exists_is_idempotent() {
        let (_dir, area) = test_area();
        let serial = area.next_serial();
        let path = area.stage(serial, &b"x"[..]).unwrap();

        remove_if_exists(&path);
        assert!(!path.exists());
        // Second call is a no-op, not an error.
        remove_if_exists(&path);
    }

    #[test]
    fn load_from_uses_configured_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("configured");
        let config_path = dir.path().join("staging.toml");
        std::fs::write(
            &config_path,
            format!("[staging]\nroot = {:?}\n", root.display().to_string()),
        )
        .unwrap();

        let area = StagingArea::load_from(&config_path).unwrap();
        assert_eq!(area.root(), root);
        assert!(root.is_dir());
    }
}
