//! The transportable blob: `base64(salt || iv || ciphertext_with_tag)`.

use crate::encoding::encode_bytes;
use crate::error::{CryptoError, CryptoResult};
use crate::random::{IV_SIZE, SALT_SIZE};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use zeroize::Zeroizing;

/// Bytes before the ciphertext in a combined blob.
pub const HEADER_SIZE: usize = SALT_SIZE + IV_SIZE;

/// Salt, IV, and AEAD output of one encryption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedBlob {
    pub salt: [u8; SALT_SIZE],
    pub iv: [u8; IV_SIZE],
    /// Ciphertext followed by the 16-byte GCM tag.
    pub ciphertext: Vec<u8>,
}

impl EncryptedBlob {
    /// Concatenates salt, IV, and ciphertext.
    pub fn combine(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_SIZE + self.ciphertext.len());
        out.extend_from_slice(&self.salt);
        out.extend_from_slice(&self.iv);
        out.extend_from_slice(&self.ciphertext);
        out
    }

    /// Splits a combined buffer at the fixed salt and IV offsets.
    pub fn extract(combined: &[u8]) -> CryptoResult<Self> {
        if combined.len() < HEADER_SIZE {
            return Err(CryptoError::MalformedBlob(format!(
                "combined length {} is shorter than salt + iv ({HEADER_SIZE})",
                combined.len()
            )));
        }

        let (salt, rest) = combined.split_at(SALT_SIZE);
        let (iv, ciphertext) = rest.split_at(IV_SIZE);

        let mut blob = Self {
            salt: [0u8; SALT_SIZE],
            iv: [0u8; IV_SIZE],
            ciphertext: ciphertext.to_vec(),
        };
        blob.salt.copy_from_slice(salt);
        blob.iv.copy_from_slice(iv);
        Ok(blob)
    }

    /// Encodes the combined form as base64.
    pub fn to_base64(&self) -> CryptoResult<String> {
        encode_bytes(&self.combine())
    }

    /// Decodes a base64 blob. Invalid base64 and short payloads are both
    /// reported as [`CryptoError::MalformedBlob`].
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let combined = Zeroizing::new(
            BASE64
                .decode(encoded.trim())
                .map_err(|e| CryptoError::MalformedBlob(format!("invalid base64: {e}")))?,
        );
        Self::extract(&combined)
    }
}
