//! Shared fixtures: a temporary env directory with a provisioned base file.

#![allow(dead_code)]

use envseal_env::{EnvContext, EnvSettings, EnvTarget, SecretManager, Tier};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Installs a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct Fixture {
    pub dir: TempDir,
    pub manager: SecretManager,
}

impl Fixture {
    /// Empty env directory; the process environment is ignored on reads.
    pub fn new() -> Self {
        Self::with_settings(|_| {})
    }

    pub fn with_settings(tweak: impl FnOnce(&mut EnvSettings)) -> Self {
        init_tracing();
        let dir = tempfile::tempdir().unwrap();
        let mut settings = EnvSettings::with_env_dir(dir.path());
        settings.prefer_process_env = false;
        tweak(&mut settings);
        let manager = SecretManager::new(EnvContext::new(settings).unwrap());
        Self { dir, manager }
    }

    /// Fixture with a DEV master key already in the base file.
    pub fn provisioned() -> Self {
        let fx = Self::new();
        assert!(fx.manager.provision_master_key("DEV_SECRET_KEY").unwrap());
        fx
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.path().join(file)
    }

    pub fn write(&self, file: &str, contents: &str) -> PathBuf {
        let path = self.path(file);
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn read(&self, file: &str) -> String {
        fs::read_to_string(self.path(file)).unwrap()
    }

    pub fn dev(&self) -> EnvTarget {
        EnvTarget::for_tier(Tier::Dev).unwrap()
    }
}

/// Value of `key` as written in the file at `path`.
pub fn raw(path: &Path, key: &str) -> Option<String> {
    envseal_env::EnvFile::load("T", path, false)
        .unwrap()
        .raw_value(key)
        .map(str::to_string)
}
