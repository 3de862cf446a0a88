//! Cache of parsed configuration files, keyed by display name and path.

use crate::env_file::EnvFile;
use crate::error::{EnvError, EnvResult};
use crate::locks::normalize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::debug;

type CacheKey = (String, PathBuf);

/// Thread-safe configuration cache.
///
/// Hits only take the read lock. A miss takes the write lock, checks again,
/// and parses the file while still holding it, so each file is loaded once
/// and an invalidation can never be overtaken by a stale load.
#[derive(Default)]
pub struct ConfigCache {
    entries: RwLock<HashMap<CacheKey, Arc<EnvFile>>>,
}

impl ConfigCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached configuration, loading it on first access.
    pub fn get_or_load(
        &self,
        name: &str,
        path: &Path,
        prefer_process_env: bool,
    ) -> EnvResult<Arc<EnvFile>> {
        let key = (name.to_string(), normalize(path));

        // Fast path
        {
            let entries = self
                .entries
                .read()
                .map_err(|e| EnvError::Lock(e.to_string()))?;
            if let Some(file) = entries.get(&key) {
                return Ok(Arc::clone(file));
            }
        }

        let mut entries = self
            .entries
            .write()
            .map_err(|e| EnvError::Lock(e.to_string()))?;
        if let Some(file) = entries.get(&key) {
            return Ok(Arc::clone(file));
        }

        let file = Arc::new(EnvFile::load(name, path, prefer_process_env)?);
        entries.insert(key, Arc::clone(&file));
        Ok(file)
    }

    /// Drops every cached configuration read from `path`.
    pub fn invalidate_path(&self, path: &Path) -> EnvResult<usize> {
        let target = normalize(path);
        let mut entries = self
            .entries
            .write()
            .map_err(|e| EnvError::Lock(e.to_string()))?;
        let before = entries.len();
        entries.retain(|(_, cached), _| *cached != target);
        let removed = before - entries.len();
        if removed > 0 {
            debug!("invalidated {removed} cached configuration(s) for {}", path.display());
        }
        Ok(removed)
    }

    pub fn clear(&self) -> EnvResult<()> {
        self.entries
            .write()
            .map_err(|e| EnvError::Lock(e.to_string()))?
            .clear();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
