//! Deployment tiers and encryption targets.

use crate::error::{EnvError, EnvResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// A deployment tier. Each non-base tier has its own configuration file
/// and its own master key stored in the base file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Base,
    Dev,
    Uat,
    Prod,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Base, Tier::Dev, Tier::Uat, Tier::Prod];

    /// Name used in logs and as the configuration cache key.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Base => "BASE",
            Self::Dev => "DEV",
            Self::Uat => "UAT",
            Self::Prod => "PROD",
        }
    }

    /// File name of this tier's configuration, relative to the env directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Base => ".env",
            Self::Dev => ".env.dev",
            Self::Uat => ".env.uat",
            Self::Prod => ".env.prod",
        }
    }

    /// Variable in the base file holding this tier's master key.
    pub fn key_name(self) -> Option<&'static str> {
        match self {
            Self::Base => None,
            Self::Dev => Some("DEV_SECRET_KEY"),
            Self::Uat => Some("UAT_SECRET_KEY"),
            Self::Prod => Some("PROD_SECRET_KEY"),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Tier {
    type Err = EnvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BASE" => Ok(Self::Base),
            "DEV" => Ok(Self::Dev),
            "UAT" => Ok(Self::Uat),
            "PROD" => Ok(Self::Prod),
            other => Err(EnvError::InvalidArgument(format!("unknown tier: {other}"))),
        }
    }
}

/// Where a variable lives and which master key protects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvTarget {
    /// Display name of the configuration (e.g. `DEV`).
    pub config_name: String,
    /// Configuration file. Bare file names resolve against the env directory.
    pub env_file: PathBuf,
    /// Name of the master key variable in the base file.
    pub key_type: String,
}

impl EnvTarget {
    pub fn new(
        config_name: impl Into<String>,
        env_file: impl Into<PathBuf>,
        key_type: impl Into<String>,
    ) -> Self {
        Self {
            config_name: config_name.into(),
            env_file: env_file.into(),
            key_type: key_type.into(),
        }
    }

    /// Target for a tier's own file and key. The base tier has no key.
    pub fn for_tier(tier: Tier) -> EnvResult<Self> {
        let key = tier.key_name().ok_or_else(|| {
            EnvError::InvalidArgument(format!("{tier} tier has no master key"))
        })?;
        Ok(Self::new(tier.display_name(), tier.file_name(), key))
    }
}
