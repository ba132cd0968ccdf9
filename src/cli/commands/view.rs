//! `view` — decrypt and print the entry for a service.

use crate::cli::output;
use crate::cli::prompt_text;
use crate::errors::Result;
use crate::vault::SharedVault;

/// Execute the `view` command.
pub fn execute(vault: &SharedVault) -> Result<()> {
    let service = prompt_text("Service")?;

    let credential = vault.lock().view(&service)?;

    output::print_credential(&credential);
    Ok(())
}
