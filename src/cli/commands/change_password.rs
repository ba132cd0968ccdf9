//! `change-password` — rotate the master password.
//!
//! Every stored password is decrypted with the current key and
//! re-encrypted under a key derived from the new password and a fresh
//! salt.  The vault is only rewritten once all entries have been
//! re-encrypted, in a single transaction.

use crate::cli::output;
use crate::cli::prompt_new_password;
use crate::errors::Result;
use crate::vault::SharedVault;

/// Execute the `change-password` command.
pub fn execute(vault: &SharedVault) -> Result<()> {
    let new_password =
        prompt_new_password("New master password", "Confirm new master password")?;

    let count = vault.lock().change_master_password(&new_password)?;

    output::success("Master password changed.");
    output::info(&format!("{count} stored password(s) re-encrypted."));
    Ok(())
}
