use thiserror::Error;

/// All errors that can occur in PassVault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Input errors ---
    #[error("{0} cannot be empty")]
    EmptyInput(&'static str),

    // --- Crypto errors ---
    #[error("Incorrect master password")]
    IncorrectMasterPassword,

    #[error("Decryption failed — wrong key or corrupted data")]
    DecryptionFailed,

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Vault errors ---
    #[error("No entry found for service '{0}'")]
    NotFound(String),

    #[error("Invalid vault format: {0}")]
    InvalidVaultFormat(String),

    #[error("Vault is locked — unlock it with the master password first")]
    VaultLocked,

    #[error("Vault is already unlocked")]
    AlreadyUnlocked,

    #[error("Vault is closed")]
    VaultClosed,

    // --- Storage errors ---
    #[error("Storage failure: {0}")]
    StorageFailure(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Password mismatch — passwords do not match")]
    PasswordMismatch,
}

/// Convenience type alias for PassVault results.
pub type Result<T> = std::result::Result<T, VaultError>;
