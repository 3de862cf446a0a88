//! Per-file write locks.
//!
//! Every read-modify-write of a configuration file runs under the lock for
//! that file's normalized path, so two writers in one process never
//! interleave their rewrites.

use crate::error::{EnvError, EnvResult};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Registry of one mutex per configuration file.
#[derive(Default)]
pub struct FileLocks {
    locks: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl FileLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock for `path`, creating it on first use.
    pub fn lock_for(&self, path: &Path) -> EnvResult<Arc<Mutex<()>>> {
        let key = normalize(path);
        let mut locks = self
            .locks
            .lock()
            .map_err(|e| EnvError::Lock(e.to_string()))?;
        Ok(Arc::clone(locks.entry(key).or_default()))
    }

    /// Runs `f` while holding the lock for `path`.
    pub fn with_lock<T>(&self, path: &Path, f: impl FnOnce() -> EnvResult<T>) -> EnvResult<T> {
        let lock = self.lock_for(path)?;
        let _guard = lock.lock().map_err(|e| EnvError::Lock(e.to_string()))?;
        f()
    }

    pub fn len(&self) -> usize {
        self.locks.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Absolute, lexically cleaned form of `path`, used as the lock and cache
/// key. The filesystem is never consulted, so a file maps to the same key
/// before and after its directory is created.
pub fn normalize(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
