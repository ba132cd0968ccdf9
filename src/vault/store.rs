//! Durable storage for the salt record and the entry collection.
//!
//! `VaultStore` owns one SQLite connection and knows nothing about
//! encryption: ciphertext goes in and comes out as opaque bytes.  Every
//! mutating call is committed before it returns, and the re-keying commit
//! replaces the salt and every ciphertext inside a single transaction.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use super::entry::{Entry, EntryId};
use crate::crypto::{KdfParams, Salt};
use crate::errors::{Result, VaultError};

/// Schema for the two logical tables.  `AUTOINCREMENT` keeps ids
/// monotonic so a deleted id is never handed out again.
const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS vault_meta (
        id          INTEGER PRIMARY KEY CHECK (id = 1),
        salt        TEXT NOT NULL,
        kdf_params  TEXT
    );
    CREATE TABLE IF NOT EXISTS passwords (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        service     TEXT NOT NULL,
        username    TEXT NOT NULL,
        password    BLOB NOT NULL
    );
";

const UPSERT_META: &str =
    "INSERT OR REPLACE INTO vault_meta (id, salt, kdf_params) VALUES (1, ?1, ?2)";

/// The salt record: the salt plus the KDF parameters it was used with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VaultMeta {
    pub salt: Salt,
    pub kdf: KdfParams,
}

/// The storage handle.  Create one with `VaultStore::open` (file-backed)
/// or `VaultStore::open_in_memory`, then hand it to a `VaultManager`.
pub struct VaultStore {
    conn: Connection,

    /// `None` for in-memory stores.
    path: Option<PathBuf>,
}

impl VaultStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Open (or create) the vault database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let store = Self::init(Connection::open(path)?, Some(path.to_path_buf()))?;

        // Owner-only access to the vault file.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        debug!(path = %path.display(), "vault store opened");
        Ok(store)
    }

    /// Open a throwaway store that lives only as long as the handle.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        // A write is not acknowledged until it has reached the disk.
        conn.pragma_update(None, "synchronous", "FULL")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn, path })
    }

    // ------------------------------------------------------------------
    // Salt record
    // ------------------------------------------------------------------

    /// Load the salt and KDF parameters, or `None` for a fresh vault.
    ///
    /// Vaults written without KDF parameters use the PBKDF2 defaults.
    pub fn load_meta(&self) -> Result<Option<VaultMeta>> {
        let row: Option<(String, Option<String>)> = self
            .conn
            .query_row(
                "SELECT salt, kdf_params FROM vault_meta WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((salt_b64, kdf_json)) = row else {
            return Ok(None);
        };

        let salt_bytes = BASE64
            .decode(salt_b64.as_bytes())
            .map_err(|e| VaultError::InvalidVaultFormat(format!("salt is not base64: {e}")))?;
        let salt = Salt::from_slice(&salt_bytes)?;

        let kdf = match kdf_json {
            Some(json) => serde_json::from_str(&json)
                .map_err(|e| VaultError::InvalidVaultFormat(format!("KDF params: {e}")))?,
            None => KdfParams::default(),
        };

        Ok(Some(VaultMeta { salt, kdf }))
    }

    /// Load just the salt, or `None` for a fresh vault.
    pub fn load_salt(&self) -> Result<Option<Salt>> {
        Ok(self.load_meta()?.map(|meta| meta.salt))
    }

    /// Persist the salt record, replacing any previous one.
    pub fn save_salt(&mut self, salt: &Salt, kdf: &KdfParams) -> Result<()> {
        let (salt_b64, kdf_json) = encode_meta(salt, kdf)?;
        self.conn.execute(UPSERT_META, params![salt_b64, kdf_json])?;
        debug!("salt record saved");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Entries
    // ------------------------------------------------------------------

    /// Insert a new entry and return the id the database assigned.
    pub fn insert_entry(
        &mut self,
        service: &str,
        username: &str,
        password_ciphertext: &[u8],
    ) -> Result<EntryId> {
        self.conn.execute(
            "INSERT INTO passwords (service, username, password) VALUES (?1, ?2, ?3)",
            params![service, username, password_ciphertext],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, "entry inserted");
        Ok(id)
    }

    /// Fetch the first entry (in insertion order) whose service matches
    /// exactly.
    pub fn get_entry(&self, service: &str) -> Result<Entry> {
        self.conn
            .query_row(
                "SELECT id, service, username, password FROM passwords
                 WHERE service = ?1 ORDER BY id LIMIT 1",
                params![service],
                row_to_entry,
            )
            .optional()?
            .ok_or_else(|| VaultError::NotFound(service.to_string()))
    }

    /// Remove every entry whose service matches exactly.
    ///
    /// Returns the number of rows removed.
    pub fn delete_entry(&mut self, service: &str) -> Result<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM passwords WHERE service = ?1", params![service])?;
        if removed == 0 {
            return Err(VaultError::NotFound(service.to_string()));
        }
        debug!(removed, "entries deleted");
        Ok(removed)
    }

    /// All service names in insertion order.
    pub fn list_services(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT service FROM passwords ORDER BY id")?;
        let services = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(services)
    }

    /// Service names containing `query`, ignoring case, in insertion order.
    ///
    /// Matching is done on Unicode lowercase forms, so `"ünï"` finds
    /// `"Ünïcode"` just as `"git"` finds `"GitHub"`.  The query is plain
    /// text; no character acts as a wildcard.
    pub fn search_services(&self, query: &str) -> Result<Vec<String>> {
        let needle = query.to_lowercase();
        let services = self
            .list_services()?
            .into_iter()
            .filter(|service| service.to_lowercase().contains(&needle))
            .collect();
        Ok(services)
    }

    /// Every entry, in insertion order.
    pub fn entries(&self) -> Result<Vec<Entry>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, service, username, password FROM passwords ORDER BY id")?;
        let entries = stmt
            .query_map([], row_to_entry)?
            .collect::<rusqlite::Result<Vec<Entry>>>()?;
        Ok(entries)
    }

    // ------------------------------------------------------------------
    // Re-keying
    // ------------------------------------------------------------------

    /// Swap in a new salt record and a new ciphertext for every entry,
    /// all in one transaction.
    ///
    /// `replacements` must cover every stored entry exactly once.  If a
    /// replacement matches no row, or the table holds entries that are not
    /// being replaced, nothing is written.
    pub fn commit_rekey(
        &mut self,
        salt: &Salt,
        kdf: &KdfParams,
        replacements: &[(EntryId, Vec<u8>)],
    ) -> Result<()> {
        let (salt_b64, kdf_json) = encode_meta(salt, kdf)?;

        // Dropping `tx` without `commit` rolls everything back.
        let tx = self.conn.transaction()?;
        tx.execute(UPSERT_META, params![salt_b64, kdf_json])?;

        let stored: i64 = tx.query_row("SELECT COUNT(*) FROM passwords", [], |row| row.get(0))?;
        if usize::try_from(stored).ok() != Some(replacements.len()) {
            return Err(VaultError::InvalidVaultFormat(format!(
                "re-key covers {} entries but the vault holds {stored}",
                replacements.len()
            )));
        }

        {
            let mut stmt = tx.prepare("UPDATE passwords SET password = ?1 WHERE id = ?2")?;
            for (id, ciphertext) in replacements {
                let changed = stmt.execute(params![ciphertext, id])?;
                if changed != 1 {
                    return Err(rusqlite::Error::StatementChangedRows(changed).into());
                }
            }
        }

        tx.commit()?;
        info!(entries = replacements.len(), "re-key committed");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Close the connection, reporting any error SQLite raises on the way.
    pub fn close(self) -> Result<()> {
        let Self { conn, path } = self;
        conn.close().map_err(|(_, e)| VaultError::StorageFailure(e))?;
        debug!(path = ?path, "vault store closed");
        Ok(())
    }

    /// Returns the path to the database file (`None` when in memory).
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: row.get(0)?,
        service: row.get(1)?,
        username: row.get(2)?,
        password_ciphertext: row.get(3)?,
    })
}

fn encode_meta(salt: &Salt, kdf: &KdfParams) -> Result<(String, String)> {
    let kdf_json = serde_json::to_string(kdf)
        .map_err(|e| VaultError::InvalidVaultFormat(format!("KDF params: {e}")))?;
    Ok((BASE64.encode(salt.as_bytes()), kdf_json))
}
