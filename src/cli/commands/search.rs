//! `search` — find services by substring.

use crate::cli::output;
use crate::cli::prompt_text;
use crate::errors::Result;
use crate::vault::SharedVault;

/// Execute the `search` command.
pub fn execute(vault: &SharedVault) -> Result<()> {
    let query = prompt_text("Search query")?;

    let results = vault.lock().search(&query)?;

    if results.is_empty() {
        output::info(&format!("No services found matching: {query}"));
        return Ok(());
    }

    output::print_services(&results);
    Ok(())
}
