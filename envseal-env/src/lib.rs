//! Environment-file secret manager for envseal.
//!
//! Configuration is spread over one base file and one file per tier:
//!
//! ```text
//! envs/.env        DEV_SECRET_KEY=<base64>  UAT_SECRET_KEY=...  PROD_SECRET_KEY=...
//! envs/.env.dev    DB_PASSWORD=<plaintext or base64 blob>
//! envs/.env.uat    ...
//! envs/.env.prod   ...
//! ```
//!
//! [`SecretManager::encrypt_variable`] replaces a plaintext value with a blob
//! sealed under the tier's master key; [`SecretManager::decrypt_variable`]
//! reads it back. All managers built on the same [`EnvContext`] share one
//! configuration cache and one lock per file.

mod cache;
mod context;
pub mod env_file;
mod error;
mod locks;
mod manager;
mod settings;
mod tier;

pub use cache::ConfigCache;
pub use context::EnvContext;
pub use env_file::EnvFile;
pub use error::{EnvError, EnvResult};
pub use locks::FileLocks;
pub use manager::{EncryptOutcome, SecretManager};
pub use settings::{DEFAULT_ENCRYPTED_LENGTH_THRESHOLD, EnvSettings};
pub use tier::{EnvTarget, Tier};
