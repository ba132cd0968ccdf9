//! `list` — show every saved service.

use crate::cli::output;
use crate::errors::Result;
use crate::vault::SharedVault;

/// Execute the `list` command.
pub fn execute(vault: &SharedVault) -> Result<()> {
    let services = vault.lock().list()?;

    if services.is_empty() {
        output::info("No services found.");
        output::tip("Type `add` to store your first password.");
        return Ok(());
    }

    output::info(&format!("{} saved service(s)", services.len()));
    output::print_services(&services);
    Ok(())
}
