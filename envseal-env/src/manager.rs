//! Encrypts configuration values in place and decrypts them on read.
//!
//! Master keys live in the base configuration, one variable per tier
//! (`DEV_SECRET_KEY`, ...). A tier's own file holds its variables as either
//! plaintext or base64 blobs. Whether a stored value is already a blob is
//! decided by length alone: anything longer than
//! [`EnvSettings::encrypted_length_threshold`](crate::EnvSettings) characters
//! is left untouched.

use crate::context::EnvContext;
use crate::env_file::{EnvFile, ensure_file, is_variable_set, update_variable};
use crate::error::{EnvError, EnvResult, require_non_blank};
use crate::tier::EnvTarget;
use envseal_crypto::{
    CryptoError, KEY_SIZE, MasterKey, decrypt, decrypt_async, encode_key, encrypt,
    generate_secret_key,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use zeroize::Zeroizing;

/// What `encrypt_variable` did with a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptOutcome {
    /// The value was encrypted and the file rewritten.
    Encrypted,
    /// The value was already longer than the threshold; the file is untouched.
    AlreadyEncrypted,
}

/// Secret manager bound to a shared [`EnvContext`].
#[derive(Clone)]
pub struct SecretManager {
    ctx: Arc<EnvContext>,
}

impl SecretManager {
    pub fn new(ctx: Arc<EnvContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &Arc<EnvContext> {
        &self.ctx
    }

    // ── Master keys ─────────────────────────────────────────────

    /// Reads and decodes the master key `key_name` from the base configuration.
    pub fn master_key(&self, key_name: &str) -> EnvResult<MasterKey> {
        require_non_blank(key_name, "Key name")?;
        self.ctx.base_config()?.master_key(key_name)
    }

    /// Writes `key_name=encoded_key` into `base_file` unless the variable
    /// already has a non-empty value. Returns whether the file was changed.
    pub fn save_master_key_once(
        &self,
        base_file: &Path,
        key_name: &str,
        encoded_key: &str,
    ) -> EnvResult<bool> {
        require_non_blank(key_name, "Key name")?;
        require_non_blank(encoded_key, "Encoded key")?;
        let path = self.ctx.resolve(base_file);

        self.ctx.rewrite(&path, || {
            ensure_file(&path)?;
            if is_variable_set(&path, key_name)? {
                debug!("{key_name} already set in {}, leaving it", path.display());
                return Ok(false);
            }
            update_variable(&path, key_name, encoded_key)?;
            info!("saved {key_name} to {}", path.display());
            Ok(true)
        })
    }

    /// Generates a fresh 32-byte master key and saves it into the base file
    /// unless one is already present.
    pub fn provision_master_key(&self, key_name: &str) -> EnvResult<bool> {
        let key = generate_secret_key(KEY_SIZE)?;
        let encoded = Zeroizing::new(encode_key(&key)?);
        let base = self.ctx.settings().base_file_path();
        self.save_master_key_once(&base, key_name, &encoded)
    }

    // ── Encryption ──────────────────────────────────────────────

    /// Encrypts one variable in the target file in place.
    ///
    /// The value is read from disk under the file lock, never from the
    /// cache. When the process environment is preferred, a non-empty
    /// variable of the same name supplies the value, and its encrypted form
    /// is appended if the file has no line for it yet.
    pub fn encrypt_variable(
        &self,
        target: &EnvTarget,
        variable: &str,
    ) -> EnvResult<EncryptOutcome> {
        require_non_blank(variable, "Variable name")?;
        let path = self.ctx.resolve(&target.env_file);
        let settings = self.ctx.settings();
        let threshold = settings.encrypted_length_threshold;

        self.ctx.rewrite(&path, || {
            let current = EnvFile::load(
                target.config_name.as_str(),
                path.as_path(),
                settings.prefer_process_env,
            )?;
            let value = Zeroizing::new(current.get_property(variable).map_err(|_| {
                EnvError::InvalidArgument(format!(
                    "{variable} has no value in {} configuration",
                    target.config_name
                ))
            })?);

            if value.chars().count() > threshold {
                info!(
                    "{variable} in {} is already encrypted, skipping",
                    target.config_name
                );
                return Ok(EncryptOutcome::AlreadyEncrypted);
            }

            let key = self.master_key(&target.key_type)?;
            let blob = encrypt(&key, &value).inspect_err(|e| {
                error!("encrypt_variable: {variable} in {}: {e}", target.config_name);
            })?;
            update_variable(&path, variable, &blob)?;
            info!("encrypted {variable} in {}", path.display());
            Ok(EncryptOutcome::Encrypted)
        })
    }

    /// Encrypts each named variable in order. Blank names are skipped; the
    /// first failure stops the batch and is reported as a crypto error
    /// naming the variable. Crypto failures pass through unchanged.
    pub fn encrypt_variables<S: AsRef<str>>(
        &self,
        target: &EnvTarget,
        variables: &[S],
    ) -> EnvResult<Vec<EncryptOutcome>> {
        if variables.is_empty() {
            return Err(EnvError::InvalidArgument(
                "Variable list cannot be null or empty".into(),
            ));
        }

        let mut outcomes = Vec::with_capacity(variables.len());
        for variable in variables {
            let variable = variable.as_ref();
            if variable.trim().is_empty() {
                warn!("skipping blank variable name in {}", target.config_name);
                continue;
            }
            let outcome = self.encrypt_variable(target, variable).map_err(|e| {
                error!("encrypt_variables: {variable} in {}: {e}", target.config_name);
                match e {
                    EnvError::Crypto(inner) => EnvError::Crypto(inner),
                    other => EnvError::Crypto(CryptoError::Encryption(format!(
                        "{variable} in {}: {other}",
                        target.config_name
                    ))),
                }
            })?;
            outcomes.push(outcome);
        }
        Ok(outcomes)
    }

    // ── Decryption ──────────────────────────────────────────────

    /// Decrypts one variable. A non-empty process environment variable of
    /// the same name takes precedence over the file when enabled.
    pub fn decrypt_variable(&self, target: &EnvTarget, variable: &str) -> EnvResult<String> {
        require_non_blank(variable, "Variable name")?;
        let key = self.master_key(&target.key_type)?;
        self.decrypt_with(&key, target, variable)
    }

    /// Decrypts each named variable, preserving order and skipping blank
    /// names. The master key is read once.
    pub fn decrypt_variables<S: AsRef<str>>(
        &self,
        target: &EnvTarget,
        variables: &[S],
    ) -> EnvResult<Vec<String>> {
        if variables.is_empty() {
            return Ok(Vec::new());
        }

        let key = self.master_key(&target.key_type)?;
        let mut values = Vec::with_capacity(variables.len());
        for variable in variables {
            let variable = variable.as_ref();
            if variable.trim().is_empty() {
                warn!("skipping blank variable name in {}", target.config_name);
                continue;
            }
            values.push(self.decrypt_with(&key, target, variable)?);
        }
        Ok(values)
    }

    /// [`decrypt_variable`](Self::decrypt_variable) with the key derivation
    /// and cipher work moved to tokio's blocking pool.
    pub async fn decrypt_variable_async(
        &self,
        target: &EnvTarget,
        variable: &str,
    ) -> EnvResult<String> {
        require_non_blank(variable, "Variable name")?;
        let key = self.master_key(&target.key_type)?;
        let blob = self.stored_value(target, variable)?;
        decrypt_async(key, blob).await.map_err(|e| {
            error!("decrypt_variable_async: {variable} in {}: {e}", target.config_name);
            EnvError::from(e)
        })
    }

    fn decrypt_with(
        &self,
        key: &MasterKey,
        target: &EnvTarget,
        variable: &str,
    ) -> EnvResult<String> {
        let blob = self.stored_value(target, variable)?;
        decrypt(key, &blob).map_err(|e| {
            error!("decrypt_variable: {variable} in {}: {e}", target.config_name);
            EnvError::from(e)
        })
    }

    fn stored_value(&self, target: &EnvTarget, variable: &str) -> EnvResult<String> {
        self.ctx
            .config(&target.config_name, &target.env_file)?
            .get_property(variable)
    }
}
