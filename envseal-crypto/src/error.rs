//! Error types for the encryption layer.

use thiserror::Error;

/// Result type for cryptographic operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors raised by validation, key generation, and the encryption engine.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// A parameter was empty, blank, or out of range. Always raised before
    /// any cryptographic work starts.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("decryption failed: {0}")]
    Decryption(String),

    /// The blob could not be decoded or is too short to hold salt and IV.
    #[error("malformed encrypted blob: {0}")]
    MalformedBlob(String),

    /// The authentication tag did not verify: wrong key, wrong IV, or
    /// corrupted ciphertext.
    #[error("decryption failed: tag mismatch (wrong key, IV, or corrupted ciphertext)")]
    TagMismatch,
}

impl CryptoError {
    /// True for authentication failures during decryption.
    pub fn is_tag_mismatch(&self) -> bool {
        matches!(self, Self::TagMismatch)
    }

    /// True for validation failures detected before any crypto ran.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }
}
