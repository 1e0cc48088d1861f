// ==========================================
// Tupacery Reports - Source Cache
// ==========================================
// I/O layer above the importers: a parsed report is reused while
// its file keeps the same (size, modified time) fingerprint.
// Only the most recent entry is kept.
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::SystemTime;
use tracing::debug;

/// Identity of a source file as seen by the filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint {
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

impl Fingerprint {
    /// Reads the fingerprint of `path`
    ///
    /// # Errors
    /// FileNotFound when the path does not exist
    pub fn of(path: &Path) -> ImportResult<Self> {
        if !path.exists() {
            return Err(ImportError::FileNotFound(path.display().to_string()));
        }
        let meta = fs::metadata(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            size: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

struct CacheEntry<T> {
    fingerprint: Fingerprint,
    value: Arc<T>,
}

/// Single-entry cache from file fingerprint to parsed value
pub struct SourceCache<T> {
    entry: Mutex<Option<CacheEntry<T>>>,
}

impl<T> Default for SourceCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SourceCache<T> {
    pub fn new() -> Self {
        Self {
            entry: Mutex::new(None),
        }
    }

    fn lock(&self) -> ImportResult<MutexGuard<'_, Option<CacheEntry<T>>>> {
        self.entry
            .lock()
            .map_err(|e| ImportError::LockError(e.to_string()))
    }

    /// Returns the cached value for `path`, parsing the file when its
    /// fingerprint changed
    ///
    /// # Arguments
    /// * `path` - source file
    /// * `parse` - turns the file bytes into the cached value
    ///
    /// # Errors
    /// FileNotFound / FileReadError from the filesystem, or whatever
    /// `parse` returns; a failed parse leaves the previous entry in place
    pub fn load<F>(&self, path: &Path, parse: F) -> ImportResult<Arc<T>>
    where
        F: FnOnce(&[u8]) -> ImportResult<T>,
    {
        let fingerprint = Fingerprint::of(path)?;

        let mut entry = self.lock()?;
        if let Some(cached) = entry.as_ref() {
            if cached.fingerprint == fingerprint {
                debug!(path = %path.display(), "source cache hit");
                return Ok(Arc::clone(&cached.value));
            }
        }

        debug!(path = %path.display(), size = fingerprint.size, "source cache miss");
        let bytes = fs::read(path)?;
        let value = Arc::new(parse(&bytes)?);
        *entry = Some(CacheEntry {
            fingerprint,
            value: Arc::clone(&value),
        });
        Ok(value)
    }

    /// Fingerprint of the cached entry, if any
    pub fn cached_fingerprint(&self) -> ImportResult<Option<Fingerprint>> {
        Ok(self.lock()?.as_ref().map(|e| e.fingerprint.clone()))
    }

    pub fn clear(&self) -> ImportResult<()> {
        *self.lock()? = None;
        Ok(())
    }
}
