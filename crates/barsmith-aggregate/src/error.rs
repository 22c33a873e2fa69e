//! Bar builder errors.

use barsmith_types::{Period, ValidationError};
use thiserror::Error;

/// Result type for bar builder construction.
pub type Result<T> = std::result::Result<T, BuilderError>;

/// Errors raised when constructing a bar builder.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// The period belongs to a different bar formation policy.
    #[error("{builder} builder cannot build {period} bars")]
    PeriodMismatch {
        /// Builder that rejected the period.
        builder: &'static str,
        /// Period that was supplied.
        period: Period,
    },

    /// The period parameters are invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
