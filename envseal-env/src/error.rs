//! Secret manager error types.

use envseal_crypto::CryptoError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for secret manager operations.
pub type EnvResult<T> = Result<T, EnvError>;

/// Errors raised while reading, encrypting, or rewriting configuration files.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The key is missing from the configuration or has an empty value.
    #[error("{key} not found in {config} configuration")]
    NotFound { key: String, config: String },

    #[error("crypto error: {0}")]
    Crypto(#[source] CryptoError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("lock poisoned: {0}")]
    Lock(String),
}

impl EnvError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn not_found(key: &str, config: &str) -> Self {
        Self::NotFound {
            key: key.to_string(),
            config: config.to_string(),
        }
    }

    /// True when decryption failed authentication.
    pub fn is_tag_mismatch(&self) -> bool {
        matches!(self, Self::Crypto(e) if e.is_tag_mismatch())
    }
}

impl From<CryptoError> for EnvError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::InvalidArgument(msg) => Self::InvalidArgument(msg),
            other => Self::Crypto(other),
        }
    }
}

/// Rejects blank names and values before any file or crypto work.
pub(crate) fn require_non_blank(value: &str, name: &str) -> EnvResult<()> {
    Ok(envseal_crypto::validate::require_non_blank(value, name)?)
}
