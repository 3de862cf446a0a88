//! Encryption layer for envseal.
//!
//! Secrets are sealed with:
//! - Argon2id to derive a one-off key from a long-lived master key and a
//!   random salt
//! - AES-256-GCM (16-byte IV, 128-bit tag) for authenticated encryption
//! - Zeroization of every key and plaintext buffer on drop
//!
//! # Blob format
//!
//! ```text
//! base64( salt[32] || iv[16] || ciphertext || tag[16] )
//! ```
//!
//! The salt and IV are fresh per call, so encrypting the same value twice
//! never yields the same blob. Decryption re-derives the key from the
//! embedded salt; a failed tag check is reported as
//! [`CryptoError::TagMismatch`] and never as garbage plaintext.

mod blob;
mod cipher;
mod encoding;
mod error;
mod key;
mod random;
pub mod validate;

pub use blob::{EncryptedBlob, HEADER_SIZE};
pub use cipher::{TAG_SIZE, decrypt, decrypt_async, decrypt_blob, encrypt, encrypt_bytes};
pub use encoding::{
    decode_key, decode_to_bytes, decode_to_string, encode_bytes, encode_key, encode_str,
};
pub use error::{CryptoError, CryptoResult};
pub use key::{DERIVED_KEY_SIZE, DerivedKey, KDF_PARAMS, KEY_SIZE, KdfParams, MasterKey, derive_key};
pub use random::{IV_SIZE, SALT_SIZE, generate_iv, generate_salt, generate_secret_key};
