//! CLI module for nodestat
//!
//! Thin adapter over the library:
//! - status: bootstrap a registry from a configuration file and print its
//!   status snapshot
//! - validate: check a configuration file

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{run, run_command, status, status_json, validate, validate_json};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{render_json, write_json};
