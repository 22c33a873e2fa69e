//! Error types for barsmith core types.

use thiserror::Error;

/// Result type alias for validation of core types.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Errors raised when a core definition is configured inconsistently.
///
/// These indicate a programming or configuration mistake and are reported
/// at construction time, never while ticks are being processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A price or quantity increment was zero, negative or not finite.
    #[error("Invalid increment: {0} (expected a finite value greater than zero)")]
    InvalidIncrement(String),

    /// A period parameter was zero.
    #[error("Invalid period {period}: {reason}")]
    InvalidPeriod {
        /// The offending period, as displayed.
        period: String,
        /// Why the period was rejected.
        reason: &'static str,
    },

    /// An instrument identifier was empty.
    #[error("Instrument id must not be empty")]
    EmptyInstrumentId,
}

/// Error returned when parsing an invalid period string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "invalid period '{0}', expected e.g. 30-Second, 5-Minute, 100-Tick, 4-Range, 12/8/(Auto)-PriceAction, s30, m5, t100, r4, pa12/8"
)]
pub struct PeriodParseError(pub(crate) String);
