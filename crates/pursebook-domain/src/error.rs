use std::fmt;

use crate::TransactionKind;

/// Reasons a transaction or reminder configuration is rejected at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    NonPositiveAmount(f64),
    EmptyCategory,
    UnknownCategory {
        kind: TransactionKind,
        category: String,
    },
    InvalidTime(String),
    ZeroCadence,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NonPositiveAmount(amount) => {
                write!(f, "amount must be greater than zero (got {amount})")
            }
            ValidationError::EmptyCategory => f.write_str("category is required"),
            ValidationError::UnknownCategory { kind, category } => {
                write!(f, "`{category}` is not a valid {kind} category")
            }
            ValidationError::InvalidTime(raw) => {
                write!(f, "`{raw}` is not a valid time of day (expected HH:MM)")
            }
            ValidationError::ZeroCadence => f.write_str("reminder cadence must be at least one day"),
        }
    }
}

impl std::error::Error for ValidationError {}
