//! Vault module — encrypted password storage.
//!
//! This module provides:
//! - `Entry` and `Credential` types (`entry`)
//! - SQLite-backed durable storage with no knowledge of crypto (`store`)
//! - The session state machine and re-keying protocol (`manager`)
//! - A mutex-guarded handle for sharing one vault across threads (`shared`)

pub mod entry;
pub mod manager;
pub mod shared;
pub mod store;

// Re-export the most commonly used items.
pub use entry::{Credential, Entry, EntryId};
pub use manager::{VaultManager, VaultState};
pub use shared::SharedVault;
pub use store::{VaultMeta, VaultStore};
