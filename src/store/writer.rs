//! Append-only log writer with fsync enforcement
//!
//! A write is acknowledged only after the record is on disk. If the write
//! or the fsync fails, the file is cut back to its previous length so the
//! log never ends in a partial record. If even that cut fails, the writer
//! is poisoned and refuses every later append.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::errors::{StoreError, StoreResult};
use super::record::LogRecord;

/// Appends records to the card log.
pub struct LogWriter {
    path: PathBuf,
    file: File,
    current_offset: u64,
    poisoned: bool,
}

impl LogWriter {
    /// Opens or creates the log file, creating parent directories if needed.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    StoreError::io_error(
                        format!("Failed to create data directory: {}", parent.display()),
                        e,
                    )
                })?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                StoreError::io_error(format!("Failed to open card log: {}", path.display()), e)
            })?;

        let current_offset = file
            .metadata()
            .map_err(|e| StoreError::io_error("Failed to read card log metadata", e))?
            .len();

        Ok(Self {
            path: path.to_path_buf(),
            file,
            current_offset,
            poisoned: false,
        })
    }

    /// Returns the log file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the current end-of-log offset.
    pub fn current_offset(&self) -> u64 {
        self.current_offset
    }

    /// Appends a record and fsyncs.
    ///
    /// Returns the byte offset where the record starts.
    pub fn append(&mut self, record: &LogRecord) -> StoreResult<u64> {
        if self.poisoned {
            return Err(StoreError::internal(format!(
                "Card log {} may end in a partial record; reopen the store",
                self.path.display()
            )));
        }

        let bytes = record.serialize();
        let offset = self.current_offset;

        let result = self
            .file
            .write_all(&bytes)
            .and_then(|_| self.file.sync_all());

        if let Err(e) = result {
            if let Err(trunc) = self.file.set_len(offset) {
                self.poisoned = true;
                tracing::error!(
                    path = %self.path.display(),
                    offset,
                    error = %trunc,
                    "failed to cut back partial record, card log writer poisoned"
                );
            }
            return Err(StoreError::io_error(
                format!("Failed to append record for '{}'", record.key),
                e,
            ));
        }

        self.current_offset += bytes.len() as u64;
        Ok(offset)
    }
}
