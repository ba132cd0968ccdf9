//! Entry types stored inside a vault.
//!
//! `Entry` is what the store hands back: the service and username in the
//! clear, and the password as an opaque authenticated-encrypted blob.
//! `Credential` is the decrypted view returned by the manager.

use zeroize::Zeroizing;

/// Identifier assigned by the store on insert.  Never reused.
pub type EntryId = i64;

/// A single stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: EntryId,
    pub service: String,
    pub username: String,
    /// Nonce + ciphertext + tag, as produced by `crypto::encrypt`.
    pub password_ciphertext: Vec<u8>,
}

/// A decrypted entry.  The password is wiped from memory on drop.
pub struct Credential {
    pub service: String,
    pub username: String,
    pub password: Zeroizing<String>,
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("service", &self.service)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
