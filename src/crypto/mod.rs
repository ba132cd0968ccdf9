//! Cryptographic primitives for PassVault.
//!
//! This module provides:
//! - Password-based key derivation, PBKDF2 or Argon2id (`kdf`)
//! - The zeroizing in-memory session key (`keys`)
//! - AES-256-GCM record encryption and decryption (`encryption`)

pub mod encryption;
pub mod kdf;
pub mod keys;

pub use encryption::{decrypt, encrypt};
pub use kdf::{derive_key, KdfParams, Salt, SALT_LEN};
pub use keys::{DerivedKey, KEY_LEN};
