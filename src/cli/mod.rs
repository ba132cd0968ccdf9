//! CLI module — Clap argument parser, prompts, output helpers, and the
//! interactive command loop.

pub mod commands;
pub mod output;
pub mod repl;

use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::vault::{SharedVault, VaultManager, VaultStore};

/// Exit status used when the process is stopped by SIGINT/SIGTERM.
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// PassVault CLI: local encrypted password vault.
#[derive(Parser)]
#[command(
    name = "passvault",
    about = "Local encrypted password vault",
    version
)]
pub struct Cli {
    /// Vault database file (default: from .passvault.toml, else secure_vault.db)
    #[arg(long)]
    pub vault: Option<PathBuf>,

    /// Print diagnostic logs to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Open the vault, unlock it, and run the interactive loop until `exit`.
pub fn run(cli: &Cli) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;
    let kdf = settings.kdf_params()?;
    let path = cli
        .vault
        .clone()
        .unwrap_or_else(|| settings.vault_path(&cwd));

    let store = VaultStore::open(&path)?;
    let vault = SharedVault::new(VaultManager::with_kdf_params(store, kdf));

    install_interrupt_handler(&vault)?;
    unlock(&vault)?;

    repl::run(&vault);
    Ok(())
}

/// Ask for the master password and unlock.  A vault without a salt is
/// being created, so the password is asked for twice.
fn unlock(vault: &SharedVault) -> Result<()> {
    let initialized = vault.lock().is_initialized()?;

    let password = if initialized {
        prompt_password("Master password")?
    } else {
        output::info("No vault found — choose a master password to create one.");
        prompt_new_password("Choose master password", "Confirm master password")?
    };

    vault.lock().unlock(&password)?;

    if initialized {
        output::success("Vault unlocked.");
    } else {
        output::success("Vault created and unlocked.");
    }
    Ok(())
}

/// Close the vault on SIGINT/SIGTERM before the process exits.
///
/// The handler waits for the vault lock, so a re-key in progress either
/// commits or rolls back before the store is released.  The terminal
/// settings captured here are put back first, since the signal may arrive
/// while a password prompt has echo turned off.
fn install_interrupt_handler(vault: &SharedVault) -> Result<()> {
    let vault = vault.clone();
    let terminal = TerminalState::capture();
    ctrlc::set_handler(move || {
        terminal.restore();
        eprintln!();
        output::warning("Interrupted — closing vault.");
        match vault.lock().close() {
            Ok(()) | Err(VaultError::VaultClosed) => {}
            Err(e) => output::error(&e.to_string()),
        }
        std::process::exit(INTERRUPTED_EXIT_CODE);
    })
    .map_err(|e| VaultError::CommandFailed(format!("cannot install signal handler: {e}")))
}

/// Terminal attributes of stdin as they were before any prompt ran.
#[derive(Clone, Copy)]
struct TerminalState {
    #[cfg(unix)]
    termios: Option<libc::termios>,
}

impl TerminalState {
    #[cfg(unix)]
    fn capture() -> Self {
        // SAFETY: `termios` is plain data and tcgetattr only writes into it.
        let termios = unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            (libc::tcgetattr(libc::STDIN_FILENO, &mut termios) == 0).then_some(termios)
        };
        Self { termios }
    }

    #[cfg(not(unix))]
    fn capture() -> Self {
        Self {}
    }

    fn restore(&self) {
        #[cfg(unix)]
        {
            if let Some(termios) = &self.termios {
                // SAFETY: restores attributes previously read from the same fd.
                unsafe {
                    libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, termios);
                }
            }
        }
        let _ = console::Term::stderr().show_cursor();
    }
}

// ---------------------------------------------------------------------------
// Prompts shared by the commands
//
// None of these may be called while holding the vault lock, or the
// interrupt handler could not close the vault.
// ---------------------------------------------------------------------------

/// Read one line of text, trimmed.
pub fn prompt_text(prompt: &str) -> Result<String> {
    let line: String = dialoguer::Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(line.trim().to_string())
}

/// Read a password without echoing it.
///
/// Empty input is returned as-is; the vault decides whether it is allowed.
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password(prompt: &str) -> Result<Zeroizing<String>> {
    let pw = dialoguer::Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Read a new password twice and make sure both entries agree.
pub fn prompt_new_password(prompt: &str, confirmation: &str) -> Result<Zeroizing<String>> {
    let password = prompt_password(prompt)?;
    let confirm = prompt_password(confirmation)?;

    if *password != *confirm {
        return Err(VaultError::PasswordMismatch);
    }
    Ok(password)
}

/// Yes/no confirmation, defaulting to no.
pub fn confirm(prompt: &str) -> Result<bool> {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))
}
