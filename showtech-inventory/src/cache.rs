//! Caller-owned read-through cache of segmented captures.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use log::debug;

use crate::capture::{ParsedCapture, RawCapture};
use crate::error::CaptureError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    path: PathBuf,
    modified: Option<SystemTime>,
    len: u64,
}

/// Segmented captures keyed by canonical path, modification time and length.
///
/// A file that changes on disk gets a new key, so stale entries are never
/// served; they stay resident until [`CaptureCache::invalidate`] or
/// [`CaptureCache::clear`].
#[derive(Debug)]
pub struct CaptureCache {
    max_bytes: u64,
    entries: Mutex<HashMap<CacheKey, Arc<ParsedCapture>>>,
}

impl CaptureCache {
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Cached capture for `path`, reading and segmenting it on a miss.
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<ParsedCapture>, CaptureError> {
        let key = cache_key(path)?;
        if let Some(hit) = self.lock().get(&key) {
            debug!("cache hit for {}", key.path.display());
            return Ok(Arc::clone(hit));
        }

        let parsed = Arc::new(ParsedCapture::parse(RawCapture::read(
            path,
            self.max_bytes,
        )?)?);
        self.lock().insert(key, Arc::clone(&parsed));
        Ok(parsed)
    }

    /// Drop every cached version of `path`. Returns how many were removed.
    pub fn invalidate(&self, path: &Path) -> usize {
        let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|key, _| key.path != target);
        before - entries.len()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, Arc<ParsedCapture>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn cache_key(path: &Path) -> Result<CacheKey, CaptureError> {
    let io_err = |source| CaptureError::Io {
        path: path.display().to_string(),
        source,
    };
    let canonical = fs::canonicalize(path).map_err(io_err)?;
    let meta = fs::metadata(&canonical).map_err(io_err)?;
    Ok(CacheKey {
        path: canonical,
        modified: meta.modified().ok(),
        len: meta.len(),
    })
}
