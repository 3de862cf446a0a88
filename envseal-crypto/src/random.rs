//! Random IVs, salts, and master keys.
//!
//! All randomness comes from `rand::rng()`, a CSPRNG that is lazily created
//! per thread and reseeded from the OS by `rand` itself. Nothing here is
//! shared across threads.

use crate::error::CryptoResult;
use crate::key::MasterKey;
use crate::validate::{validate_key_size, validate_size};
use rand::RngCore;

/// Default IV length in bytes.
pub const IV_SIZE: usize = 16;

/// Default salt length in bytes.
pub const SALT_SIZE: usize = 32;

/// Returns `size` random bytes for use as an IV.
pub fn generate_iv(size: usize) -> CryptoResult<Vec<u8>> {
    validate_size(size, "IV")?;
    Ok(random_bytes(size))
}

/// Returns `size` random bytes for use as a KDF salt.
pub fn generate_salt(size: usize) -> CryptoResult<Vec<u8>> {
    validate_size(size, "Salt")?;
    Ok(random_bytes(size))
}

/// Generates a master key of `size` bytes (16, 24, or 32).
pub fn generate_secret_key(size: usize) -> CryptoResult<MasterKey> {
    validate_key_size(size)?;
    MasterKey::from_bytes(random_bytes(size))
}

/// Fills `buf` from the thread-local CSPRNG.
pub(crate) fn fill_random(buf: &mut [u8]) {
    rand::rng().fill_bytes(buf);
}

fn random_bytes(size: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; size];
    fill_random(&mut bytes);
    bytes
}
