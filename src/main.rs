//! cardvault CLI entry point
//!
//! All logic is delegated to the CLI module; this only maps failure to a
//! non-zero exit.

use cardvault::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}: {}", e.code(), e);
        std::process::exit(1);
    }
}
