//! Session orchestration: unlock, CRUD, and master-password rotation.
//!
//! A `VaultManager` owns exactly one `VaultStore` and moves through
//! `Locked -> Unlocked -> Closed`.  It is the only component that knows
//! which key encrypted which record.
//!
//! # Wrong master passwords are detected lazily
//!
//! Key derivation cannot tell a right password from a wrong one, so
//! `unlock` always succeeds once a key has been derived.  A wrong password
//! shows up as `IncorrectMasterPassword` on the first operation that has to
//! decrypt stored ciphertext (`view`, `change_master_password`).  An empty
//! vault cannot detect it at all: whatever password is used for the first
//! `add` becomes the real one.

use tracing::{debug, info};
use zeroize::Zeroizing;

use super::entry::{Credential, EntryId};
use super::store::{VaultMeta, VaultStore};
use crate::crypto::{self, derive_key, DerivedKey, KdfParams, Salt};
use crate::errors::{Result, VaultError};

/// Where a manager is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultState {
    Locked,
    Unlocked,
    Closed,
}

/// Key material for an unlocked session.
struct Session {
    /// Zeroized when the session is dropped or replaced.
    key: DerivedKey,
    meta: VaultMeta,
}

/// Owns a vault for the lifetime of one session.
pub struct VaultManager {
    /// `None` once the vault has been closed.
    store: Option<VaultStore>,

    /// `Some` while unlocked.
    session: Option<Session>,

    /// Parameters used when creating a vault or re-keying one.
    kdf: KdfParams,
}

impl VaultManager {
    /// Wrap an explicitly opened store, using the default KDF parameters.
    pub fn new(store: VaultStore) -> Self {
        Self::with_kdf_params(store, KdfParams::default())
    }

    /// Wrap a store, using `kdf` for new vaults and for re-keying.
    ///
    /// Existing vaults always unlock with the parameters stored in them.
    pub fn with_kdf_params(store: VaultStore, kdf: KdfParams) -> Self {
        Self {
            store: Some(store),
            session: None,
            kdf,
        }
    }

    pub fn state(&self) -> VaultState {
        match (&self.store, &self.session) {
            (None, _) => VaultState::Closed,
            (Some(_), None) => VaultState::Locked,
            (Some(_), Some(_)) => VaultState::Unlocked,
        }
    }

    /// KDF parameters the unlocked vault's key was derived with.
    pub fn kdf_params(&self) -> Result<KdfParams> {
        Ok(self.session()?.meta.kdf)
    }

    /// Whether the store already holds a salt (i.e. the vault exists).
    pub fn is_initialized(&self) -> Result<bool> {
        Ok(self.store()?.load_salt()?.is_some())
    }

    // ------------------------------------------------------------------
    // Unlock
    // ------------------------------------------------------------------

    /// Derive the session key from `master_password`.
    ///
    /// A fresh vault gets a new salt, persisted before the session starts.
    /// For an existing vault this succeeds for any non-empty password; see
    /// the module docs.
    pub fn unlock(&mut self, master_password: &str) -> Result<()> {
        if self.session.is_some() {
            return Err(VaultError::AlreadyUnlocked);
        }
        if master_password.is_empty() {
            return Err(VaultError::EmptyInput("master password"));
        }

        let kdf = self.kdf;
        let store = self.store_mut()?;

        let session = match store.load_meta()? {
            Some(meta) => {
                let key = derive_key(master_password.as_bytes(), &meta.salt, &meta.kdf)?;
                debug!(kdf = ?meta.kdf, "session key derived");
                Session { key, meta }
            }
            None => {
                let meta = VaultMeta {
                    salt: Salt::generate(),
                    kdf,
                };
                let key = derive_key(master_password.as_bytes(), &meta.salt, &meta.kdf)?;
                store.save_salt(&meta.salt, &meta.kdf)?;
                info!(kdf = ?meta.kdf, "new vault initialized");
                Session { key, meta }
            }
        };

        self.session = Some(session);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Entry operations
    // ------------------------------------------------------------------

    /// Encrypt `password` with the session key and store a new entry.
    pub fn add(&mut self, service: &str, username: &str, password: &str) -> Result<EntryId> {
        if service.is_empty() {
            return Err(VaultError::EmptyInput("service name"));
        }

        let ciphertext = crypto::encrypt(&self.session()?.key, password)?;
        self.store_mut()?.insert_entry(service, username, &ciphertext)
    }

    /// Fetch and decrypt the entry for `service`.
    ///
    /// A decrypt failure means the session key did not encrypt this record
    /// and is reported as `IncorrectMasterPassword`, never as `NotFound`.
    pub fn view(&self, service: &str) -> Result<Credential> {
        let session = self.session()?;
        let entry = self.store()?.get_entry(service)?;
        let password = open_record(&session.key, &entry.password_ciphertext)?;

        Ok(Credential {
            service: entry.service,
            username: entry.username,
            password,
        })
    }

    /// Remove every entry for `service`; returns how many were removed.
    pub fn delete(&mut self, service: &str) -> Result<usize> {
        self.session()?;
        self.store_mut()?.delete_entry(service)
    }

    /// All service names in insertion order.
    pub fn list(&self) -> Result<Vec<String>> {
        self.session()?;
        self.store()?.list_services()
    }

    /// Service names containing `query`, ignoring case.
    pub fn search(&self, query: &str) -> Result<Vec<String>> {
        self.session()?;
        self.store()?.search_services(query)
    }

    // ------------------------------------------------------------------
    // Re-keying
    // ------------------------------------------------------------------

    /// Re-encrypt every entry under a key derived from `new_password` and a
    /// brand-new salt.  Returns the number of entries re-encrypted.
    ///
    /// Every record is decrypted and re-encrypted in memory first; only then
    /// are the new salt and all new ciphertexts committed, in one
    /// transaction.  If any record fails to decrypt the call returns
    /// `IncorrectMasterPassword` and nothing is written.
    pub fn change_master_password(&mut self, new_password: &str) -> Result<usize> {
        if new_password.is_empty() {
            return Err(VaultError::EmptyInput("new master password"));
        }

        let current = self.session()?;
        let entries = self.store()?.entries()?;

        if current.meta.kdf != self.kdf {
            info!(from = ?current.meta.kdf, to = ?self.kdf, "re-key switches KDF parameters");
        }

        let meta = VaultMeta {
            salt: Salt::generate(),
            kdf: self.kdf,
        };
        let new_key = derive_key(new_password.as_bytes(), &meta.salt, &meta.kdf)?;

        let mut replacements = Vec::with_capacity(entries.len());
        for entry in &entries {
            let plaintext = open_record(&current.key, &entry.password_ciphertext)?;
            replacements.push((entry.id, crypto::encrypt(&new_key, &plaintext)?));
        }

        self.store_mut()?
            .commit_rekey(&meta.salt, &meta.kdf, &replacements)?;

        // The old session (and its key) is dropped and zeroized here.
        self.session = Some(Session { key: new_key, meta });
        info!(entries = replacements.len(), "master password changed");
        Ok(replacements.len())
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Discard the session key and release the store.
    ///
    /// Every later call, including another `close`, fails with
    /// `VaultClosed`.
    pub fn close(&mut self) -> Result<()> {
        let store = self.store.take().ok_or(VaultError::VaultClosed)?;
        self.session = None;
        store.close()?;
        info!("vault closed");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn store(&self) -> Result<&VaultStore> {
        self.store.as_ref().ok_or(VaultError::VaultClosed)
    }

    fn store_mut(&mut self) -> Result<&mut VaultStore> {
        self.store.as_mut().ok_or(VaultError::VaultClosed)
    }

    fn session(&self) -> Result<&Session> {
        self.store()?;
        self.session.as_ref().ok_or(VaultError::VaultLocked)
    }
}

/// Decrypt a stored password with the session key.
fn open_record(key: &DerivedKey, ciphertext: &[u8]) -> Result<Zeroizing<String>> {
    crypto::decrypt(key, ciphertext).map_err(|e| match e {
        VaultError::DecryptionFailed => VaultError::IncorrectMasterPassword,
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> VaultManager {
        VaultManager::new(VaultStore::open_in_memory().unwrap())
    }

    #[test]
    fn starts_locked() {
        let vault = manager();
        assert_eq!(vault.state(), VaultState::Locked);
        assert!(!vault.is_initialized().unwrap());
    }

    #[test]
    fn operations_require_unlock() {
        let mut vault = manager();
        assert!(matches!(vault.list(), Err(VaultError::VaultLocked)));
        assert!(matches!(
            vault.add("github", "alice", "pw"),
            Err(VaultError::VaultLocked)
        ));
        assert!(matches!(
            vault.change_master_password("new"),
            Err(VaultError::VaultLocked)
        ));
    }

    #[test]
    fn unlock_twice_is_rejected() {
        let mut vault = manager();
        vault.unlock("M1").unwrap();
        assert_eq!(vault.state(), VaultState::Unlocked);
        assert!(matches!(vault.unlock("M1"), Err(VaultError::AlreadyUnlocked)));
    }

    #[test]
    fn kdf_params_follow_the_session() {
        let argon2 = KdfParams::Argon2id {
            memory_kib: 8_192,
            iterations: 1,
            parallelism: 1,
        };
        let mut vault = manager();
        assert!(matches!(vault.kdf_params(), Err(VaultError::VaultLocked)));

        vault.unlock("M1").unwrap();
        assert_eq!(vault.kdf_params().unwrap(), KdfParams::default());

        vault.kdf = argon2;
        vault.change_master_password("M2").unwrap();
        assert_eq!(vault.kdf_params().unwrap(), argon2);
    }

    #[test]
    fn close_moves_to_closed() {
        let mut vault = manager();
        vault.unlock("M1").unwrap();
        vault.close().unwrap();
        assert_eq!(vault.state(), VaultState::Closed);
        assert!(matches!(vault.close(), Err(VaultError::VaultClosed)));
        assert!(matches!(vault.unlock("M1"), Err(VaultError::VaultClosed)));
    }
}
