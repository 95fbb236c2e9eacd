//! Service error types
//!
//! Wraps the validator and store errors, plus the one check that runs
//! before either: the caller must name an owner.

use thiserror::Error;

use crate::card::CardKey;
use crate::store::StoreError;
use crate::validation::ValidationError;

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from card service operations
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No ownership context was supplied with the request
    #[error("User must be in query string")]
    MissingOwner,

    /// No card under the key
    #[error("No card '{0}'")]
    NotFound(CardKey),

    /// The candidate or patch failed validation
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The store refused or failed the operation
    #[error("{0}")]
    Store(#[from] StoreError),
}

impl ServiceError {
    /// Stable string code for the error
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::MissingOwner => "CARD_MISSING_OWNER",
            ServiceError::NotFound(_) => "CARD_NOT_FOUND",
            ServiceError::Validation(e) => e.code().code(),
            ServiceError::Store(e) => e.code().code(),
        }
    }

    /// Whether the error means "no such card"
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(ServiceError::MissingOwner.code(), "CARD_MISSING_OWNER");
        assert_eq!(
            ServiceError::NotFound(CardKey::new("jose", 99)).code(),
            "CARD_NOT_FOUND"
        );
        assert_eq!(
            ServiceError::from(ValidationError::unknown_field("power")).code(),
            "CARD_UNKNOWN_FIELD"
        );
    }

    #[test]
    fn test_duplicate_key_passes_through() {
        let err = ServiceError::from(StoreError::duplicate_key(&CardKey::new("jose", 0)));
        assert_eq!(err.code(), "STORE_DUPLICATE_KEY");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_write_conflict_passes_through() {
        let err = ServiceError::from(StoreError::conflict(&CardKey::new("jose", 0)));
        assert_eq!(err.code(), "STORE_WRITE_CONFLICT");
        assert!(matches!(err, ServiceError::Store(_)));
    }
}
