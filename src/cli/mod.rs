//! CLI module for cardvault
//!
//! Provides command-line interface for:
//! - serve: HTTP card API
//! - validate: One-shot validation of a card on stdin
//! - init: Create the file store's data directory

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{init, run, run_command, serve, validate};
pub use config::{Config, StorageKind};
pub use errors::{CliError, CliResult};
pub use io::{read_request, write_error, write_response};
