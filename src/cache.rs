//! Fingerprint-keyed result cache
//!
//! A [`ResultCache`] remembers the [`Report`] produced for an archive and
//! hands it back unchanged as long as the archive's size and modification
//! time have not moved. It is an ordinary value owned by whoever drives the
//! runs; nothing here is process-global.

use crate::error::{Error, Result};
use crate::report::Report;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Identity of an archive file at one point in time
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    /// Archive path as given to the run
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Last modification time
    pub mtime: SystemTime,
}

impl Fingerprint {
    /// Take the fingerprint of the file at `path`
    pub fn of(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::ArchiveNotFound(path.display().to_string()),
            _ => Error::Io(e),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            size: metadata.len(),
            mtime: metadata.modified()?,
        })
    }
}

/// Reports of earlier runs, one per archive path
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: HashMap<PathBuf, (Fingerprint, Report)>,
}

impl ResultCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored report, if it was produced for exactly this fingerprint
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&Report> {
        self.entries
            .get(&fingerprint.path)
            .filter(|(stored, _)| stored == fingerprint)
            .map(|(_, report)| report)
    }

    /// Store a report, replacing whatever was cached for the same path
    pub fn store(&mut self, fingerprint: Fingerprint, report: Report) {
        self.entries
            .insert(fingerprint.path.clone(), (fingerprint, report));
    }

    /// Forget the entry for `path`
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    /// Number of cached archives
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::{CheckId, Finding};
    use std::time::Duration;

    fn fingerprint(path: &str, size: u64, secs: u64) -> Fingerprint {
        Fingerprint {
            path: PathBuf::from(path),
            size,
            mtime: SystemTime::UNIX_EPOCH + Duration::from_secs(secs),
        }
    }

    #[test]
    fn test_hit_requires_same_fingerprint() {
        let mut cache = ResultCache::new();
        let mut report = Report::new();
        report
            .geometry_data
            .insert(CheckId::ArchiveSize, Finding::passed("Archive size is 1 MB"));
        cache.store(fingerprint("a.zip", 10, 100), report.clone());

        assert_eq!(cache.get(&fingerprint("a.zip", 10, 100)), Some(&report));
        assert!(cache.get(&fingerprint("a.zip", 10, 101)).is_none());
        assert!(cache.get(&fingerprint("a.zip", 11, 100)).is_none());
        assert!(cache.get(&fingerprint("b.zip", 10, 100)).is_none());
    }

    #[test]
    fn test_store_replaces_stale_entry() {
        let mut cache = ResultCache::new();
        cache.store(fingerprint("a.zip", 10, 100), Report::new());
        cache.store(fingerprint("a.zip", 10, 200), Report::new());
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&fingerprint("a.zip", 10, 100)).is_none());
        assert!(cache.get(&fingerprint("a.zip", 10, 200)).is_some());
        assert!(cache.invalidate(Path::new("a.zip")));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_fingerprint_of_missing_file() {
        let err = Fingerprint::of(Path::new("/nonexistent/asset.zip")).unwrap_err();
        assert!(err.to_string().contains("[E1004]"));
    }
}
