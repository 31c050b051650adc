//! Core error types for the allocation and rebalance engine.
//!
//! Per-domain error enums are wrapped into the root [`Error`] via `#[from]`.
//! Errors are fatal to the enclosing computation: callers re-run with
//! corrected input, there is no partial-result recovery.

use thiserror::Error;

use crate::allocation::AllocationError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Allocation failed: {0}")]
    Allocation(#[from] AllocationError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Errors signalling inconsistent caller-supplied data.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Target fractions sum to {0:.6}, expected 1")]
    TargetSumMismatch(f64),

    #[error("Combined account present value must be positive, got {0}")]
    NonPositivePortfolio(f64),
}

// The engine only serializes caller-facing output models, so serde_json
// failures surface as validation problems.
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}
