//! Record store error types
//!
//! Error codes:
//! - STORE_DUPLICATE_KEY (REJECT)
//! - STORE_WRITE_CONFLICT (REJECT)
//! - STORE_IO_ERROR (ERROR)
//! - STORE_DATA_CORRUPTION (FATAL)

use std::fmt;
use std::io;

use crate::card::CardKey;

/// Severity levels for store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Request rejected, state unchanged
    Reject,
    /// Operation failed, server continues
    Error,
    /// Store cannot be trusted; opening must abort
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Store error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// A record already exists under the key
    DuplicateKey,
    /// The stored record changed since the caller read it
    Conflict,
    /// Disk I/O failure
    Io,
    /// Log record failed its checksum or framing
    Corruption,
}

impl StoreErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            StoreErrorCode::DuplicateKey => "STORE_DUPLICATE_KEY",
            StoreErrorCode::Conflict => "STORE_WRITE_CONFLICT",
            StoreErrorCode::Io => "STORE_IO_ERROR",
            StoreErrorCode::Corruption => "STORE_DATA_CORRUPTION",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            StoreErrorCode::DuplicateKey | StoreErrorCode::Conflict => Severity::Reject,
            StoreErrorCode::Io => Severity::Error,
            StoreErrorCode::Corruption => Severity::Fatal,
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Store error with context
#[derive(Debug)]
pub struct StoreError {
    code: StoreErrorCode,
    message: String,
    key: Option<CardKey>,
    details: Option<String>,
    source: Option<io::Error>,
}

impl StoreError {
    /// A record already occupies `key`
    pub fn duplicate_key(key: &CardKey) -> Self {
        Self {
            code: StoreErrorCode::DuplicateKey,
            message: format!("Card '{}' already exists", key),
            key: Some(key.clone()),
            details: None,
            source: None,
        }
    }

    /// The record under `key` no longer matches what the caller read
    pub fn conflict(key: &CardKey) -> Self {
        Self {
            code: StoreErrorCode::Conflict,
            message: format!("Card '{}' was modified concurrently", key),
            key: Some(key.clone()),
            details: None,
            source: None,
        }
    }

    /// Disk I/O failure
    pub fn io_error(message: impl Into<String>, source: io::Error) -> Self {
        Self {
            code: StoreErrorCode::Io,
            message: message.into(),
            key: None,
            details: None,
            source: Some(source),
        }
    }

    /// Internal failure with no I/O cause (poisoned lock, encoding failure)
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: StoreErrorCode::Io,
            message: message.into(),
            key: None,
            details: None,
            source: None,
        }
    }

    /// Corruption with byte offset context
    pub fn corruption_at_offset(offset: u64, reason: impl Into<String>) -> Self {
        Self {
            code: StoreErrorCode::Corruption,
            message: reason.into(),
            key: None,
            details: Some(format!("byte_offset: {}", offset)),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> StoreErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the key involved, if any
    pub fn key(&self) -> Option<&CardKey> {
        self.key.as_ref()
    }

    /// Returns additional error details
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns whether the store must not be used after this error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
