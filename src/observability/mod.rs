//! Observability for cardvault
//!
//! Structured logging goes through `tracing`. Each log line names an
//! [`Event`] in its `event` field so lines can be grepped by lifecycle step.
//!
//! ```ignore
//! use cardvault::observability::{init_logging, Event};
//!
//! init_logging("info");
//! tracing::info!(event = Event::BootStart.as_str());
//! ```

mod events;
mod logging;

pub use events::Event;
pub use logging::{env_filter, init_logging, DEFAULT_LOG_FILTER};
