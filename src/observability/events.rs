//! Observable events for cardvault
//!
//! Every structured log line carries one of these as its `event` field.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Startup begins
    BootStart,
    /// Configuration loaded and validated
    ConfigLoaded,
    /// Record store opened (and replayed, for the file backend)
    StoreOpened,
    /// Listener bound, ready to serve
    ServerListening,
    /// Shutdown signal received
    ShutdownStart,
    /// Server drained and stopped
    ShutdownComplete,

    // Card writes
    /// Card stored
    CardCreated,
    /// Card replaced by a merged patch
    CardUpdated,
    /// Card removed
    CardDeleted,
    /// Candidate or patch refused by the validator
    ValidationRejected,

    /// Store reported corruption (FATAL)
    StoreCorruption,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::BootStart => "CARDVAULT_STARTUP_BEGIN",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreOpened => "STORE_OPENED",
            Event::ServerListening => "CARDVAULT_SERVING",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",

            Event::CardCreated => "CARD_CREATED",
            Event::CardUpdated => "CARD_UPDATED",
            Event::CardDeleted => "CARD_DELETED",
            Event::ValidationRejected => "VALIDATION_REJECTED",

            Event::StoreCorruption => "STORE_CORRUPTION",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
