//! CLI argument definitions using clap
//!
//! Commands:
//! - cardvault serve [--config <path>] [--port <port>]
//! - cardvault validate [--config <path>]
//! - cardvault init --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// cardvault - card collection service
#[derive(Parser, Debug)]
#[command(name = "cardvault")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the card API over HTTP until interrupted
    Serve {
        /// Path to configuration file (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port to listen on; overrides the config file and PORT
        #[arg(long)]
        port: Option<u16>,
    },

    /// Validate one card read from stdin and print the result
    Validate {
        /// Path to configuration file (selects the presence rule)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create the data directory for the file store
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./cardvault.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_with_port() {
        let cli = Cli::try_parse_from(["cardvault", "serve", "--port", "8080"]).unwrap();
        match cli.command {
            Command::Serve { config, port } => {
                assert!(config.is_none());
                assert_eq!(port, Some(8080));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_init_has_default_config_path() {
        let cli = Cli::try_parse_from(["cardvault", "init"]).unwrap();
        match cli.command {
            Command::Init { config } => assert_eq!(config, PathBuf::from("./cardvault.json")),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_port() {
        assert!(Cli::try_parse_from(["cardvault", "serve", "--port", "http"]).is_err());
    }
}
