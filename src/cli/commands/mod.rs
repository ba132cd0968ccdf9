//! One module per interactive command.
//!
//! Each `execute` gathers its input first and only then locks the vault
//! for a single manager call.

pub mod add;
pub mod change_password;
pub mod delete;
pub mod list;
pub mod search;
pub mod view;
