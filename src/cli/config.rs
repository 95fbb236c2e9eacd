//! Configuration file for the cardvault binary
//!
//! A JSON object; every field is optional. A missing config path means
//! all defaults: in-memory storage, port 3000, explicit presence checks.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::http_server::HttpServerConfig;
use crate::observability::{Event, DEFAULT_LOG_FILTER};
use crate::store::{FileStore, MemoryStore, RecordStore};
use crate::validation::{CardValidator, PresenceCheck, ValidationConfig};

use super::errors::{CliError, CliResult};

/// Which record store backs the service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Process-local, lost on exit
    #[default]
    Memory,
    /// Append-only log under `data_dir`
    File,
}

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Bind address and CORS
    #[serde(flatten)]
    pub http: HttpServerConfig,

    /// Storage backend (default: "memory")
    #[serde(default)]
    pub storage: StorageKind,

    /// Data directory (required for "file" storage)
    #[serde(default)]
    pub data_dir: Option<String>,

    /// Presence rule for conditional fields (default: "explicit")
    #[serde(default)]
    pub presence_check: PresenceCheck,

    /// `tracing` filter directive (default: "info"); `RUST_LOG` wins
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpServerConfig::default(),
            storage: StorageKind::default(),
            data_dir: None,
            presence_check: PresenceCheck::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config = serde_json::from_str(&content).map_err(CliError::ConfigParse)?;

        config.validate()?;

        Ok(config)
    }

    /// Load from `path` if given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> CliResult<()> {
        if self.http.host.trim().is_empty() {
            return Err(CliError::InvalidConfig("host must not be empty".into()));
        }

        if self.storage == StorageKind::File && self.data_path().is_none() {
            return Err(CliError::InvalidConfig(
                "data_dir is required when storage is 'file'".into(),
            ));
        }

        Ok(())
    }

    /// Applies the `PORT` environment value, if any
    pub fn apply_port_env(&mut self, raw: Option<&str>) -> CliResult<()> {
        self.http
            .apply_port_override(raw)
            .map_err(|bad| CliError::InvalidConfig(format!("Invalid PORT: '{}'", bad)))
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> Option<PathBuf> {
        self.data_dir
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
    }

    /// Validator configured with this file's presence rule
    pub fn validator(&self) -> CardValidator {
        CardValidator::new(ValidationConfig::new(self.presence_check))
    }

    /// Opens the configured store. The file store replays its log first.
    pub fn build_store(&self) -> CliResult<Arc<dyn RecordStore>> {
        match self.storage {
            StorageKind::Memory => Ok(Arc::new(MemoryStore::new())),
            StorageKind::File => {
                let data_dir = self.data_path().ok_or_else(|| {
                    CliError::InvalidConfig("data_dir is required when storage is 'file'".into())
                })?;

                let store = FileStore::open(&data_dir).map_err(|e| {
                    if e.is_fatal() {
                        tracing::error!(event = Event::StoreCorruption.as_str(), "{}", e);
                    }
                    CliError::Store(e)
                })?;
                Ok(Arc::new(store))
            }
        }
    }
}
