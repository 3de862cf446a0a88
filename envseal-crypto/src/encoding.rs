//! Base64 text encoding for blobs and persisted keys.
//!
//! Standard alphabet with padding, so values written by other tools that use
//! the same encoding remain readable.

use crate::error::{CryptoError, CryptoResult};
use crate::key::MasterKey;
use crate::validate::{require_non_empty, require_non_empty_bytes};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};

/// Encodes bytes to base64. Empty input is rejected.
pub fn encode_bytes(data: &[u8]) -> CryptoResult<String> {
    require_non_empty_bytes(data, "Byte array")?;
    Ok(BASE64.encode(data))
}

/// Decodes base64 text to bytes.
pub fn decode_to_bytes(encoded: &str) -> CryptoResult<Vec<u8>> {
    require_non_empty(encoded, "String")?;
    BASE64
        .decode(encoded)
        .map_err(|e| CryptoError::InvalidArgument(format!("invalid base64: {e}")))
}

/// Encodes UTF-8 text to base64.
pub fn encode_str(data: &str) -> CryptoResult<String> {
    require_non_empty(data, "String")?;
    Ok(BASE64.encode(data.as_bytes()))
}

/// Decodes base64 back to UTF-8 text.
pub fn decode_to_string(encoded: &str) -> CryptoResult<String> {
    let bytes = decode_to_bytes(encoded)?;
    String::from_utf8(bytes)
        .map_err(|_| CryptoError::InvalidArgument("decoded bytes are not valid UTF-8".into()))
}

/// Encodes a master key for storage in a configuration file.
pub fn encode_key(key: &MasterKey) -> CryptoResult<String> {
    encode_bytes(key.as_bytes())
}

/// Decodes a persisted master key.
pub fn decode_key(encoded: &str) -> CryptoResult<MasterKey> {
    require_non_empty(encoded, "Encoded key")?;
    let bytes = decode_to_bytes(encoded.trim())?;
    MasterKey::from_bytes(bytes)
}
