//! Input guards shared by the generators and the engine.

use crate::error::{CryptoError, CryptoResult};

/// AES key lengths accepted for master keys.
pub const VALID_KEY_SIZES: [usize; 3] = [16, 24, 32];

/// Rejects an empty string.
pub fn require_non_empty(value: &str, name: &str) -> CryptoResult<()> {
    if value.is_empty() {
        return Err(CryptoError::InvalidArgument(format!(
            "{name} cannot be null or empty"
        )));
    }
    Ok(())
}

/// Rejects an empty or whitespace-only string.
pub fn require_non_blank(value: &str, name: &str) -> CryptoResult<()> {
    if value.trim().is_empty() {
        return Err(CryptoError::InvalidArgument(format!(
            "{name} cannot be null or empty"
        )));
    }
    Ok(())
}

/// Rejects an empty byte slice.
pub fn require_non_empty_bytes(value: &[u8], name: &str) -> CryptoResult<()> {
    if value.is_empty() {
        return Err(CryptoError::InvalidArgument(format!(
            "{name} cannot be null or empty"
        )));
    }
    Ok(())
}

/// Rejects a zero size for IVs and salts.
pub fn validate_size(size: usize, name: &str) -> CryptoResult<()> {
    if size == 0 {
        return Err(CryptoError::InvalidArgument(format!(
            "{name} size must be positive"
        )));
    }
    Ok(())
}

/// Accepts only 16, 24, or 32 byte keys.
pub fn validate_key_size(size: usize) -> CryptoResult<()> {
    if !VALID_KEY_SIZES.contains(&size) {
        return Err(CryptoError::InvalidArgument(format!(
            "AES key size must be 16, 24, or 32 bytes, got {size}"
        )));
    }
    Ok(())
}
