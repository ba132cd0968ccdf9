//! Password-based key derivation.
//!
//! The default is PBKDF2-HMAC-SHA256 with at least 100 000 iterations, so
//! every offline guess costs a full derivation.  Argon2id is available as a
//! memory-hard alternative.  The parameters used for a vault are stored next
//! to its salt, so a vault always reopens with the settings that created it.

use argon2::{Algorithm, Argon2, Params, Version};
use hmac::Hmac;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use super::keys::{DerivedKey, KEY_LEN};
use crate::errors::{Result, VaultError};

/// Length of the salt in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Minimum (and default) PBKDF2 iteration count.
pub const MIN_PBKDF2_ITERATIONS: u32 = 100_000;

/// Minimum safe Argon2 memory cost in KiB (8 MB).
const MIN_ARGON2_MEMORY_KIB: u32 = 8_192;

/// Default Argon2id costs: 64 MB, 3 iterations, 4 lanes.
pub const DEFAULT_ARGON2_MEMORY_KIB: u32 = 65_536;
pub const DEFAULT_ARGON2_ITERATIONS: u32 = 3;
pub const DEFAULT_ARGON2_PARALLELISM: u32 = 4;

/// Random, non-secret value mixed into key derivation.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
    /// Generate a fresh random salt from the OS-seeded CSPRNG.
    pub fn generate() -> Self {
        let mut salt = [0u8; SALT_LEN];
        rand::rng().fill_bytes(&mut salt);
        Self(salt)
    }

    /// Rebuild a salt read back from storage.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let salt: [u8; SALT_LEN] = bytes.try_into().map_err(|_| {
            VaultError::InvalidVaultFormat(format!(
                "salt must be exactly {SALT_LEN} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(salt))
    }

    pub fn as_bytes(&self) -> &[u8; SALT_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for Salt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Salt(..)")
    }
}

/// Key derivation algorithm and its cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "lowercase")]
pub enum KdfParams {
    /// PBKDF2-HMAC-SHA256.
    Pbkdf2 { iterations: u32 },
    /// Argon2id (memory in KiB).
    Argon2id {
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    },
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::Pbkdf2 {
            iterations: MIN_PBKDF2_ITERATIONS,
        }
    }
}

impl KdfParams {
    /// Argon2id with the default costs.
    pub fn argon2id_default() -> Self {
        Self::Argon2id {
            memory_kib: DEFAULT_ARGON2_MEMORY_KIB,
            iterations: DEFAULT_ARGON2_ITERATIONS,
            parallelism: DEFAULT_ARGON2_PARALLELISM,
        }
    }

    /// Reject parameters too weak to throttle offline guessing.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Pbkdf2 { iterations } => {
                if iterations < MIN_PBKDF2_ITERATIONS {
                    return Err(VaultError::KeyDerivationFailed(format!(
                        "PBKDF2 iterations must be at least {MIN_PBKDF2_ITERATIONS} (got {iterations})"
                    )));
                }
            }
            Self::Argon2id {
                memory_kib,
                iterations,
                parallelism,
            } => {
                if memory_kib < MIN_ARGON2_MEMORY_KIB {
                    return Err(VaultError::KeyDerivationFailed(format!(
                        "Argon2 memory_kib must be at least {MIN_ARGON2_MEMORY_KIB} (got {memory_kib})"
                    )));
                }
                if iterations < 1 {
                    return Err(VaultError::KeyDerivationFailed(
                        "Argon2 iterations must be at least 1".into(),
                    ));
                }
                if parallelism < 1 {
                    return Err(VaultError::KeyDerivationFailed(
                        "Argon2 parallelism must be at least 1".into(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Derive a 32-byte key from a master password and salt.
///
/// Pure function of its inputs: the same password, salt and params always
/// produce the same key.  An empty password is accepted here.
pub fn derive_key(password: &[u8], salt: &Salt, params: &KdfParams) -> Result<DerivedKey> {
    params.validate()?;

    let mut key = DerivedKey::new([0u8; KEY_LEN]);
    match *params {
        KdfParams::Pbkdf2 { iterations } => {
            pbkdf2::pbkdf2::<Hmac<Sha256>>(
                password,
                salt.as_bytes(),
                iterations,
                key.as_mut_bytes(),
            )
            .map_err(|e| VaultError::KeyDerivationFailed(format!("PBKDF2 failed: {e}")))?;
        }
        KdfParams::Argon2id {
            memory_kib,
            iterations,
            parallelism,
        } => {
            let argon2_params = Params::new(memory_kib, iterations, parallelism, Some(KEY_LEN))
                .map_err(|e| {
                    VaultError::KeyDerivationFailed(format!("invalid Argon2 params: {e}"))
                })?;
            Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params)
                .hash_password_into(password, salt.as_bytes(), key.as_mut_bytes())
                .map_err(|e| {
                    VaultError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}"))
                })?;
        }
    }

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_salts_differ() {
        assert_ne!(Salt::generate(), Salt::generate());
    }

    #[test]
    fn salt_from_slice_checks_length() {
        assert!(Salt::from_slice(&[7u8; SALT_LEN]).is_ok());
        assert!(Salt::from_slice(&[7u8; 15]).is_err());
        assert!(Salt::from_slice(&[7u8; 32]).is_err());
    }

    #[test]
    fn salt_debug_hides_bytes() {
        let salt = Salt::from_slice(&[0xAB; SALT_LEN]).unwrap();
        assert_eq!(format!("{salt:?}"), "Salt(..)");
    }

    #[test]
    fn params_serialize_with_algorithm_tag() {
        let json = serde_json::to_string(&KdfParams::default()).unwrap();
        assert_eq!(json, r#"{"algorithm":"pbkdf2","iterations":100000}"#);

        let parsed: KdfParams = serde_json::from_str(
            r#"{"algorithm":"argon2id","memory_kib":8192,"iterations":1,"parallelism":1}"#,
        )
        .unwrap();
        assert_eq!(
            parsed,
            KdfParams::Argon2id {
                memory_kib: 8192,
                iterations: 1,
                parallelism: 1
            }
        );
    }

    #[test]
    fn weak_params_are_rejected() {
        assert!(KdfParams::Pbkdf2 { iterations: 1_000 }.validate().is_err());
        assert!(KdfParams::Argon2id {
            memory_kib: 1024,
            iterations: 3,
            parallelism: 4
        }
        .validate()
        .is_err());
        assert!(KdfParams::Argon2id {
            memory_kib: 8192,
            iterations: 0,
            parallelism: 1
        }
        .validate()
        .is_err());
        assert!(KdfParams::default().validate().is_ok());
        assert!(KdfParams::argon2id_default().validate().is_ok());
    }
}
