//! Thread-safe handle around a `VaultManager`.
//!
//! All access goes through one mutex, so mutating operations on the same
//! vault are serialized and a re-key holds the vault exclusively for its
//! whole scan and rewrite.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::manager::VaultManager;

/// Cloneable, shareable vault handle.
#[derive(Clone)]
pub struct SharedVault {
    inner: Arc<Mutex<VaultManager>>,
}

impl SharedVault {
    pub fn new(manager: VaultManager) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    /// Take exclusive access to the manager.
    ///
    /// A poisoned lock is recovered: the manager only changes state after
    /// its durable writes succeed, so a panicking holder cannot leave it
    /// half-updated.
    pub fn lock(&self) -> MutexGuard<'_, VaultManager> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
