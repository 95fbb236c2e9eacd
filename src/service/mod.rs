//! Card service for cardvault
//!
//! Composes the validator and a record store into the five card operations
//! the HTTP surface exposes.

mod card_service;
mod errors;

pub use card_service::CardService;
pub use errors::{ServiceError, ServiceResult};
