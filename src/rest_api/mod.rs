//! # cardvault REST API Module
//!
//! HTTP endpoints for card CRUD, backed by the card service.

pub mod errors;
pub mod query;
pub mod server;

pub use errors::{ErrorResponse, RestError, RestResult};
pub use query::CardQuery;
pub use server::RestServer;
