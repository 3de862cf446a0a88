//! Master keys, derived keys, and Argon2id key derivation.

use crate::error::{CryptoError, CryptoResult};
use crate::validate::require_non_empty_bytes;
use argon2::{Algorithm, Argon2, Params, Version};
use std::fmt;
use tracing::error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Default master key length (AES-256).
pub const KEY_SIZE: usize = 32;

/// Length of every derived encryption key.
pub const DERIVED_KEY_SIZE: usize = 32;

/// Argon2id cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

/// The fixed parameters used for every derivation. Changing them makes
/// every existing blob undecryptable.
pub const KDF_PARAMS: KdfParams = KdfParams {
    memory_kib: 64 * 1024,
    iterations: 3,
    parallelism: 4,
};

/// Long-lived symmetric key persisted once per tier.
///
/// Zeroized on drop. `Debug` never prints the key bytes.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey {
    bytes: Vec<u8>,
}

impl MasterKey {
    /// Wraps raw key bytes. Any non-empty length is accepted, since the key
    /// is only ever used as KDF input.
    pub fn from_bytes(bytes: Vec<u8>) -> CryptoResult<Self> {
        require_non_empty_bytes(&bytes, "Secret Key")?;
        Ok(Self { bytes })
    }

    /// Copies key bytes out of a slice.
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        Self::from_bytes(bytes.to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MasterKey([REDACTED; {}])", self.bytes.len())
    }
}

/// Per-operation AES-256 key derived from a master key and a salt.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey([u8; DERIVED_KEY_SIZE]);

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8; DERIVED_KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derives a 32-byte key from `master_key` and `salt` with Argon2id.
///
/// Deterministic for identical inputs; the cost parameters are
/// [`KDF_PARAMS`].
pub fn derive_key(master_key: &MasterKey, salt: &[u8]) -> CryptoResult<DerivedKey> {
    require_non_empty_bytes(master_key.as_bytes(), "Secret Key")?;
    require_non_empty_bytes(salt, "Salt")?;

    let params = Params::new(
        KDF_PARAMS.memory_kib,
        KDF_PARAMS.iterations,
        KDF_PARAMS.parallelism,
        Some(DERIVED_KEY_SIZE),
    )
    .map_err(|e| CryptoError::KeyDerivation(e.to_string()))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = DerivedKey([0u8; DERIVED_KEY_SIZE]);
    argon2
        .hash_password_into(master_key.as_bytes(), salt, &mut key.0)
        .map_err(|e| {
            error!("derive_key: argon2id failed: {e}");
            CryptoError::KeyDerivation(e.to_string())
        })?;

    Ok(key)
}
