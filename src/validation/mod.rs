//! Card validation subsystem for cardvault
//!
//! Every write path runs its candidate through `CardValidator` before
//! any storage call. The validator decides both field-kind correctness and
//! the categorical presence rules tied to `cardType`.
//!
//! # Design Principles
//!
//! - Mandatory on create and on the merged result of every update
//! - Fixed check order, first failure wins
//! - No coercion: numbers are JSON numbers, strings are JSON strings
//! - Pure function of the candidate and immutable configuration

mod errors;
mod rules;
mod validator;

pub use errors::{ValidationDetails, ValidationError, ValidationErrorCode, ValidationResult};
pub use rules::{PresenceCheck, ValidationConfig};
pub use validator::CardValidator;
