//! Shared state for secret managers: settings, configuration cache, and
//! the per-file lock registry.

use crate::cache::ConfigCache;
use crate::env_file::EnvFile;
use crate::error::EnvResult;
use crate::locks::FileLocks;
use crate::settings::EnvSettings;
use crate::tier::Tier;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Built once per process (or per test) and shared by `Arc` between every
/// manager that touches the same files.
pub struct EnvContext {
    settings: EnvSettings,
    cache: ConfigCache,
    locks: FileLocks,
}

impl EnvContext {
    pub fn new(settings: EnvSettings) -> EnvResult<Arc<Self>> {
        settings.validate()?;
        Ok(Arc::new(Self {
            settings,
            cache: ConfigCache::new(),
            locks: FileLocks::new(),
        }))
    }

    pub fn settings(&self) -> &EnvSettings {
        &self.settings
    }

    pub fn cache(&self) -> &ConfigCache {
        &self.cache
    }

    pub fn locks(&self) -> &FileLocks {
        &self.locks
    }

    /// Resolves a configuration file name against the env directory.
    pub fn resolve(&self, file: &Path) -> PathBuf {
        self.settings.resolve(file)
    }

    /// Cached configuration for `file` under display name `name`.
    pub fn config(&self, name: &str, file: &Path) -> EnvResult<Arc<EnvFile>> {
        let path = self.resolve(file);
        self.cache
            .get_or_load(name, &path, self.settings.prefer_process_env)
    }

    /// Cached base configuration, where master keys live.
    pub fn base_config(&self) -> EnvResult<Arc<EnvFile>> {
        let path = self.settings.base_file_path();
        self.cache.get_or_load(
            Tier::Base.display_name(),
            &path,
            self.settings.prefer_process_env,
        )
    }

    /// Runs a read-modify-write of `path` under its lock, then drops every
    /// cached configuration read from it.
    pub fn rewrite<T>(&self, path: &Path, f: impl FnOnce() -> EnvResult<T>) -> EnvResult<T> {
        self.locks.with_lock(path, || {
            let out = f()?;
            self.cache.invalidate_path(path)?;
            Ok(out)
        })
    }
}
