//! `add` — store a new password entry.

use crate::cli::output;
use crate::cli::{prompt_password, prompt_text};
use crate::errors::Result;
use crate::vault::SharedVault;

/// Execute the `add` command.
pub fn execute(vault: &SharedVault) -> Result<()> {
    let service = prompt_text("Service")?;
    let username = prompt_text("Username")?;
    let password = prompt_password("Password")?;

    vault.lock().add(&service, &username, &password)?;

    output::success(&format!("Entry added for service: {service}"));
    Ok(())
}
