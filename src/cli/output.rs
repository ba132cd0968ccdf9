//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use super::repl::ReplCommand;
use crate::vault::Credential;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print the available commands.
pub fn print_help(commands: &[(ReplCommand, &str)]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Command", "Description"]);

    for (command, description) in commands {
        table.add_row(vec![command.name(), *description]);
    }

    println!("{table}");
}

/// Print a numbered table of service names.
pub fn print_services(services: &[String]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Service"]);

    for (i, service) in services.iter().enumerate() {
        table.add_row(vec![(i + 1).to_string(), service.clone()]);
    }

    println!("{table}");
}

/// Print a decrypted entry.
pub fn print_credential(credential: &Credential) {
    println!("{} {}", style("Service: ").bold(), credential.service);
    println!("{} {}", style("Username:").bold(), credential.username);
    println!(
        "{} {}",
        style("Password:").bold(),
        credential.password.as_str()
    );
}
