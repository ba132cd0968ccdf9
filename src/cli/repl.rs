//! The interactive command loop.
//!
//! Each line names one command, which maps 1:1 to a vault operation.
//! Errors are printed and the loop carries on; `exit` (or end of input)
//! closes the vault.

use std::fmt;
use std::str::FromStr;

use super::commands;
use super::output;
use super::prompt_text;
use crate::errors::{Result, VaultError};
use crate::vault::SharedVault;

/// A command typed at the `passvault>` prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand {
    Add,
    View,
    Delete,
    List,
    Search,
    ChangePassword,
    Help,
    Exit,
}

impl ReplCommand {
    /// Every command with its one-line description, in display order.
    pub const ALL: [(ReplCommand, &'static str); 8] = [
        (ReplCommand::Add, "Add a new password entry"),
        (ReplCommand::View, "View the password for a service"),
        (ReplCommand::Delete, "Delete the entries for a service"),
        (ReplCommand::List, "List all saved services"),
        (ReplCommand::Search, "Search services by name"),
        (ReplCommand::ChangePassword, "Change the master password"),
        (ReplCommand::Help, "Show this list"),
        (ReplCommand::Exit, "Close the vault and exit"),
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::View => "view",
            Self::Delete => "delete",
            Self::List => "list",
            Self::Search => "search",
            Self::ChangePassword => "change-password",
            Self::Help => "help",
            Self::Exit => "exit",
        }
    }
}

impl fmt::Display for ReplCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReplCommand {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .map(|(command, _)| *command)
            .find(|command| command.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|(c, _)| c.name()).collect();
                VaultError::CommandFailed(format!(
                    "unknown command '{}' — type one of: {}",
                    s.trim(),
                    names.join(", ")
                ))
            })
    }
}

/// Run the loop until `exit` or end of input.
pub fn run(vault: &SharedVault) {
    output::print_help(&ReplCommand::ALL);

    loop {
        let line = match prompt_text("passvault") {
            Ok(line) => line,
            // End of input behaves like `exit`.
            Err(_) => break,
        };
        if line.is_empty() {
            continue;
        }

        let command = match line.parse::<ReplCommand>() {
            Ok(command) => command,
            Err(e) => {
                output::error(&e.to_string());
                continue;
            }
        };

        if command == ReplCommand::Exit {
            break;
        }

        if let Err(e) = dispatch(command, vault) {
            output::error(&e.to_string());
        }
    }

    shutdown(vault);
}

fn dispatch(command: ReplCommand, vault: &SharedVault) -> Result<()> {
    match command {
        ReplCommand::Add => commands::add::execute(vault),
        ReplCommand::View => commands::view::execute(vault),
        ReplCommand::Delete => commands::delete::execute(vault),
        ReplCommand::List => commands::list::execute(vault),
        ReplCommand::Search => commands::search::execute(vault),
        ReplCommand::ChangePassword => commands::change_password::execute(vault),
        ReplCommand::Help => {
            output::print_help(&ReplCommand::ALL);
            Ok(())
        }
        ReplCommand::Exit => Ok(()),
    }
}

/// Close the vault.  A storage error here is reported but does not stop
/// the process from exiting.
fn shutdown(vault: &SharedVault) {
    match vault.lock().close() {
        Ok(()) | Err(VaultError::VaultClosed) => {}
        Err(e) => output::error(&format!("failed to close vault cleanly: {e}")),
    }
    output::info("Goodbye!");
}
