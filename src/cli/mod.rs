//! Interactive shell over the field-service core.

mod commands;
mod core;
mod help;
pub mod output;
mod shell;

pub use self::core::{CliError, CommandError};
pub use shell::run_cli;
