//! Secret manager settings.

use crate::env_file::parse;
use crate::error::{EnvError, EnvResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Values at or below this many characters are treated as plaintext.
pub const DEFAULT_ENCRYPTED_LENGTH_THRESHOLD: usize = 90;

/// Runtime settings shared by every manager built on the same context.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvSettings {
    /// Directory that bare configuration file names resolve against.
    pub env_dir: PathBuf,

    /// File name (or path) of the base configuration holding master keys.
    pub base_file: String,

    /// A stored value longer than this (in characters) is assumed to be
    /// encrypted already and is left alone by `encrypt_variable`.
    pub encrypted_length_threshold: usize,

    /// Whether process environment variables override file values on read.
    pub prefer_process_env: bool,
}

impl Default for EnvSettings {
    fn default() -> Self {
        Self {
            env_dir: PathBuf::from("envs"),
            base_file: ".env".to_string(),
            encrypted_length_threshold: DEFAULT_ENCRYPTED_LENGTH_THRESHOLD,
            prefer_process_env: true,
        }
    }
}

impl EnvSettings {
    /// Settings rooted at `env_dir`, otherwise default.
    pub fn with_env_dir(env_dir: impl Into<PathBuf>) -> Self {
        Self {
            env_dir: env_dir.into(),
            ..Self::default()
        }
    }

    /// Loads settings from a global `KEY=VALUE` properties file.
    ///
    /// Recognised keys are `ENV_DIRECTORY`, `BASE_ENV_FILE`,
    /// `ENCRYPTED_LENGTH_THRESHOLD` and `PREFER_PROCESS_ENV`. Missing keys
    /// keep their defaults; unparseable values are logged and ignored.
    pub fn from_properties_file(path: &Path) -> EnvResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| EnvError::io(path, e))?;
        Ok(Self::from_properties(&text))
    }

    pub fn from_properties(text: &str) -> Self {
        let mut settings = Self::default();
        for (key, value) in parse(text) {
            match key.as_str() {
                "ENV_DIRECTORY" if !value.is_empty() => settings.env_dir = PathBuf::from(value),
                "BASE_ENV_FILE" if !value.is_empty() => settings.base_file = value,
                "ENCRYPTED_LENGTH_THRESHOLD" => match value.parse::<usize>() {
                    Ok(n) if n > 0 => settings.encrypted_length_threshold = n,
                    _ => warn!(
                        "invalid ENCRYPTED_LENGTH_THRESHOLD {value:?}, using {DEFAULT_ENCRYPTED_LENGTH_THRESHOLD}"
                    ),
                },
                "PREFER_PROCESS_ENV" => match value.to_ascii_lowercase().as_str() {
                    "true" | "1" | "yes" => settings.prefer_process_env = true,
                    "false" | "0" | "no" => settings.prefer_process_env = false,
                    _ => warn!("invalid PREFER_PROCESS_ENV {value:?}, keeping default"),
                },
                _ => {}
            }
        }
        settings
    }

    /// Rejects settings no manager can work with.
    pub fn validate(&self) -> EnvResult<()> {
        if self.base_file.trim().is_empty() {
            return Err(EnvError::Config("base_file cannot be empty".into()));
        }
        if self.encrypted_length_threshold == 0 {
            return Err(EnvError::Config(
                "encrypted_length_threshold must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Resolves a configuration file name. Bare names (no directory part)
    /// live in [`env_dir`](Self::env_dir); anything else is used as given.
    pub fn resolve(&self, file: &Path) -> PathBuf {
        let has_parent = file.parent().is_some_and(|p| !p.as_os_str().is_empty());
        if file.is_absolute() || has_parent {
            file.to_path_buf()
        } else {
            self.env_dir.join(file)
        }
    }

    /// Resolved path of the base configuration.
    pub fn base_file_path(&self) -> PathBuf {
        self.resolve(Path::new(&self.base_file))
    }
}
