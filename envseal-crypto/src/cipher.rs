//! AES-256-GCM encryption under an Argon2id-derived key.
//!
//! Every call draws a fresh salt and IV, derives a one-off key from the
//! master key and the salt, and seals the plaintext. The 16-byte IV is
//! non-standard for GCM (the cipher GHASHes it into the initial counter),
//! but it is what existing blobs were written with.

use crate::blob::EncryptedBlob;
use crate::error::{CryptoError, CryptoResult};
use crate::key::{DERIVED_KEY_SIZE, DerivedKey, MasterKey, derive_key};
use crate::random::{IV_SIZE, SALT_SIZE, fill_random};
use crate::validate::{require_non_empty, require_non_empty_bytes};
use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, Nonce};
use tracing::{debug, error};
use zeroize::Zeroizing;

/// Authentication tag length appended to every ciphertext.
pub const TAG_SIZE: usize = 16;

/// AES-256-GCM with a 16-byte nonce.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

fn new_cipher(key: &DerivedKey, op: &str) -> CryptoResult<Aes256Gcm16> {
    Aes256Gcm16::new_from_slice(key.as_bytes()).map_err(|_| {
        error!("{op}: cipher init rejected derived key");
        CryptoError::InvalidKeyLength {
            expected: DERIVED_KEY_SIZE,
            actual: key.as_bytes().len(),
        }
    })
}

/// Encrypts raw bytes into an [`EncryptedBlob`].
pub fn encrypt_bytes(master_key: &MasterKey, plaintext: &[u8]) -> CryptoResult<EncryptedBlob> {
    require_non_empty_bytes(master_key.as_bytes(), "Secret Key")?;
    require_non_empty_bytes(plaintext, "Data")?;

    let mut salt = [0u8; SALT_SIZE];
    let mut iv = [0u8; IV_SIZE];
    fill_random(&mut salt);
    fill_random(&mut iv);

    let derived = derive_key(master_key, &salt)?;
    let cipher = new_cipher(&derived, "encrypt")?;

    let ciphertext = cipher
        .encrypt(Nonce::<U16>::from_slice(&iv), plaintext)
        .map_err(|e| {
            error!("encrypt: aes-gcm seal failed: {e}");
            CryptoError::Encryption(e.to_string())
        })?;

    Ok(EncryptedBlob {
        salt,
        iv,
        ciphertext,
    })
}

/// Decrypts an [`EncryptedBlob`]. The plaintext buffer is wiped when dropped.
pub fn decrypt_blob(
    master_key: &MasterKey,
    blob: &EncryptedBlob,
) -> CryptoResult<Zeroizing<Vec<u8>>> {
    require_non_empty_bytes(master_key.as_bytes(), "Secret Key")?;

    let derived = derive_key(master_key, &blob.salt)?;
    let cipher = new_cipher(&derived, "decrypt")?;

    let plaintext = cipher
        .decrypt(Nonce::<U16>::from_slice(&blob.iv), blob.ciphertext.as_slice())
        .map_err(|_| {
            error!("decrypt: authentication tag did not verify");
            CryptoError::TagMismatch
        })?;

    Ok(Zeroizing::new(plaintext))
}

/// Encrypts UTF-8 text and returns the base64 blob.
pub fn encrypt(master_key: &MasterKey, plaintext: &str) -> CryptoResult<String> {
    require_non_empty(plaintext, "Data")?;
    let blob = encrypt_bytes(master_key, plaintext.as_bytes())?;
    let encoded = blob.to_base64()?;
    debug!("encrypt: produced blob of {} chars", encoded.len());
    Ok(encoded)
}

/// Decrypts a base64 blob produced by [`encrypt`].
pub fn decrypt(master_key: &MasterKey, encoded: &str) -> CryptoResult<String> {
    require_non_empty_bytes(master_key.as_bytes(), "Secret Key")?;
    require_non_empty(encoded, "Encrypted Data")?;

    let blob = EncryptedBlob::from_base64(encoded).inspect_err(|e| {
        error!("decrypt: {e}");
    })?;
    let plaintext = decrypt_blob(master_key, &blob)?;

    std::str::from_utf8(&plaintext)
        .map(str::to_owned)
        .map_err(|_| {
            error!("decrypt: plaintext is not valid UTF-8");
            CryptoError::Decryption("plaintext is not valid UTF-8".into())
        })
}

/// [`decrypt`] on tokio's blocking pool.
///
/// Key derivation dominates the cost, so this keeps it off async worker
/// threads. Must be called from within a tokio runtime.
pub async fn decrypt_async(master_key: MasterKey, encoded: String) -> CryptoResult<String> {
    tokio::task::spawn_blocking(move || decrypt(&master_key, &encoded))
        .await
        .map_err(|e| {
            error!("decrypt_async: blocking task failed: {e}");
            CryptoError::Decryption(format!("blocking task failed: {e}"))
        })?
}
