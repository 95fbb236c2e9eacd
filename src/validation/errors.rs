//! Validation error types
//!
//! Error codes:
//! - CARD_TYPE_MISMATCH
//! - CARD_INVALID_ENUM_VALUE
//! - CARD_OUT_OF_RANGE
//! - CARD_MISSING_CONDITIONAL_FIELD
//! - CARD_FORBIDDEN_CONDITIONAL_FIELD
//! - CARD_UNKNOWN_FIELD
//!
//! Every validation error rejects the request; none is fatal.

use std::fmt;

/// Validation error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorCode {
    /// Value has the wrong kind (not a number, not a string)
    TypeMismatch,
    /// Value is not a member of its fixed enumeration
    InvalidEnumValue,
    /// Value has the right kind but an unacceptable value
    OutOfRange,
    /// Field required by the card type is absent
    MissingConditionalField,
    /// Field not allowed for the card type is present
    ForbiddenConditionalField,
    /// Patch names a field outside the card field set
    UnknownField,
}

impl ValidationErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationErrorCode::TypeMismatch => "CARD_TYPE_MISMATCH",
            ValidationErrorCode::InvalidEnumValue => "CARD_INVALID_ENUM_VALUE",
            ValidationErrorCode::OutOfRange => "CARD_OUT_OF_RANGE",
            ValidationErrorCode::MissingConditionalField => "CARD_MISSING_CONDITIONAL_FIELD",
            ValidationErrorCode::ForbiddenConditionalField => "CARD_FORBIDDEN_CONDITIONAL_FIELD",
            ValidationErrorCode::UnknownField => "CARD_UNKNOWN_FIELD",
        }
    }
}

impl fmt::Display for ValidationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Which field failed, and how
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDetails {
    /// Field name (wire name, or "$root" for the payload itself)
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl ValidationDetails {
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl fmt::Display for ValidationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}': expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

/// A single validation failure: the first rule a candidate violated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    code: ValidationErrorCode,
    message: String,
    details: ValidationDetails,
}

impl ValidationError {
    /// Field has the wrong kind of value
    pub fn type_mismatch(
        field: &str,
        expected: impl Into<String>,
        actual: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: ValidationErrorCode::TypeMismatch,
            message: message.into(),
            details: ValidationDetails::new(field, expected, actual),
        }
    }

    /// Field value is outside its enumeration
    pub fn invalid_enum(
        field: &str,
        allowed: &[&str],
        actual: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: ValidationErrorCode::InvalidEnumValue,
            message: message.into(),
            details: ValidationDetails::new(field, format!("one of [{}]", allowed.join(", ")), actual),
        }
    }

    /// Field value is of the right kind but not acceptable
    pub fn out_of_range(
        field: &str,
        expected: impl Into<String>,
        actual: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: ValidationErrorCode::OutOfRange,
            message: message.into(),
            details: ValidationDetails::new(field, expected, actual),
        }
    }

    /// Field required by the card type is absent
    pub fn missing_conditional(field: &str, card_type: &str, message: impl Into<String>) -> Self {
        Self {
            code: ValidationErrorCode::MissingConditionalField,
            message: message.into(),
            details: ValidationDetails::new(
                field,
                format!("field to be present for type '{}'", card_type),
                "missing",
            ),
        }
    }

    /// Field is present but not allowed for the card type
    pub fn forbidden_conditional(field: &str, card_type: &str, message: impl Into<String>) -> Self {
        Self {
            code: ValidationErrorCode::ForbiddenConditionalField,
            message: message.into(),
            details: ValidationDetails::new(
                field,
                format!("field to be absent for type '{}'", card_type),
                "present",
            ),
        }
    }

    /// Patch names a field a card does not have
    pub fn unknown_field(field: &str) -> Self {
        Self {
            code: ValidationErrorCode::UnknownField,
            message: format!("Update is not permitted: unknown field '{}'", field),
            details: ValidationDetails::new(field, "a card field", "unknown field"),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ValidationErrorCode {
        self.code
    }

    /// Returns the human-readable reason
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending field and expectation
    pub fn details(&self) -> &ValidationDetails {
        &self.details
    }

    /// Returns the offending field name
    pub fn field(&self) -> &str {
        &self.details.field
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.code.code(), self.message, self.details)
    }
}

impl std::error::Error for ValidationError {}

/// Result type for validation
pub type ValidationResult<T> = Result<T, ValidationError>;
