use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf;
use crate::crypto::KdfParams;
use crate::errors::{Result, VaultError};

/// Which key derivation function new vaults (and re-keys) use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KdfAlgorithm {
    Pbkdf2,
    Argon2id,
}

/// Project-level configuration, loaded from `.passvault.toml`.
///
/// Every field has a sensible default so PassVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Vault database file (relative to the project directory).
    #[serde(default = "default_vault_path")]
    pub vault_path: String,

    /// Key derivation function for new keys.
    #[serde(default = "default_kdf")]
    pub kdf: KdfAlgorithm,

    /// PBKDF2-HMAC-SHA256 iteration count (minimum 100 000).
    #[serde(default = "default_pbkdf2_iterations")]
    pub pbkdf2_iterations: u32,

    /// Argon2 memory cost in KiB (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_path() -> String {
    "secure_vault.db".to_string()
}

fn default_kdf() -> KdfAlgorithm {
    KdfAlgorithm::Pbkdf2
}

fn default_pbkdf2_iterations() -> u32 {
    kdf::MIN_PBKDF2_ITERATIONS
}

fn default_argon2_memory_kib() -> u32 {
    kdf::DEFAULT_ARGON2_MEMORY_KIB
}

fn default_argon2_iterations() -> u32 {
    kdf::DEFAULT_ARGON2_ITERATIONS
}

fn default_argon2_parallelism() -> u32 {
    kdf::DEFAULT_ARGON2_PARALLELISM
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_path: default_vault_path(),
            kdf: default_kdf(),
            pbkdf2_iterations: default_pbkdf2_iterations(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    const FILE_NAME: &'static str = ".passvault.toml";

    /// Load settings from `<project_dir>/.passvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Resolve the vault database path against the project directory.
    pub fn vault_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.vault_path)
    }

    /// Convert the KDF settings into validated crypto-layer params.
    pub fn kdf_params(&self) -> Result<KdfParams> {
        let params = match self.kdf {
            KdfAlgorithm::Pbkdf2 => KdfParams::Pbkdf2 {
                iterations: self.pbkdf2_iterations,
            },
            KdfAlgorithm::Argon2id => KdfParams::Argon2id {
                memory_kib: self.argon2_memory_kib,
                iterations: self.argon2_iterations,
                parallelism: self.argon2_parallelism,
            },
        };
        params
            .validate()
            .map_err(|e| VaultError::ConfigError(e.to_string()))?;
        Ok(params)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
