//! CLI error types
//!
//! Every CLI error ends the process with a non-zero exit. `code()` is the
//! stable `CARDVAULT_CLI_*` string printed in front of the message; the
//! underlying store, I/O or JSON error stays reachable through `source()`.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::store::StoreError;

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

/// Errors from CLI commands
#[derive(Debug, Error)]
pub enum CliError {
    /// Config file could not be read
    #[error("Failed to read config {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Config file is not a valid config document
    #[error("Invalid config JSON: {0}")]
    ConfigParse(#[source] serde_json::Error),

    /// Config parsed but cannot be used as given
    #[error("{0}")]
    InvalidConfig(String),

    /// `init` found an existing card log
    #[error("Data directory already initialized: {0:?}")]
    AlreadyInitialized(PathBuf),

    /// The card store could not be opened
    #[error("Failed to open card store: {0}")]
    Store(#[from] StoreError),

    /// The runtime or the HTTP listener failed
    #[error("HTTP server failed: {0}")]
    Server(#[source] io::Error),

    /// Nothing on stdin
    #[error("Empty input")]
    EmptyInput,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Stable string code for the error
    pub fn code(&self) -> &'static str {
        match self {
            CliError::ConfigRead { .. } | CliError::ConfigParse(_) | CliError::InvalidConfig(_) => {
                "CARDVAULT_CLI_CONFIG_ERROR"
            }
            CliError::AlreadyInitialized(_) => "CARDVAULT_CLI_ALREADY_INITIALIZED",
            CliError::Store(_) | CliError::Server(_) => "CARDVAULT_CLI_BOOT_FAILED",
            CliError::EmptyInput | CliError::Io(_) | CliError::Json(_) => "CARDVAULT_CLI_IO_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_codes() {
        assert_eq!(
            CliError::InvalidConfig("data_dir is required".into()).code(),
            "CARDVAULT_CLI_CONFIG_ERROR"
        );
        assert_eq!(
            CliError::AlreadyInitialized(PathBuf::from("data")).code(),
            "CARDVAULT_CLI_ALREADY_INITIALIZED"
        );
        assert_eq!(CliError::EmptyInput.code(), "CARDVAULT_CLI_IO_ERROR");
    }

    #[test]
    fn test_json_error_is_io_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = CliError::from(json_err);
        assert_eq!(err.code(), "CARDVAULT_CLI_IO_ERROR");
        assert!(err.to_string().starts_with("JSON error"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_store_error_is_kept_as_source() {
        let err = CliError::from(StoreError::corruption_at_offset(64, "checksum mismatch"));
        assert_eq!(err.code(), "CARDVAULT_CLI_BOOT_FAILED");
        assert!(err.to_string().contains("STORE_DATA_CORRUPTION"));

        let source = err.source().and_then(|e| e.downcast_ref::<StoreError>()).unwrap();
        assert!(source.is_fatal());
        assert_eq!(source.details(), Some("byte_offset: 64"));
    }
}
