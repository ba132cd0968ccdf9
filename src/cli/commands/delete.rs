//! `delete` — remove the entries for a service.

use crate::cli::output;
use crate::cli::{confirm, prompt_text};
use crate::errors::Result;
use crate::vault::SharedVault;

/// Execute the `delete` command.
pub fn execute(vault: &SharedVault) -> Result<()> {
    let service = prompt_text("Service")?;

    if !confirm(&format!("Delete entry for '{service}'?"))? {
        output::info("Cancelled.");
        return Ok(());
    }

    let removed = vault.lock().delete(&service)?;

    if removed > 1 {
        output::success(&format!("Deleted {removed} entries for service: {service}"));
    } else {
        output::success(&format!("Entry deleted for service: {service}"));
    }
    Ok(())
}
