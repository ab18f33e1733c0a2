//! Strategy domain errors.

use thiserror::Error;

/// A leg field violates its invariant.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LegError {
    /// Strike must be a positive finite number.
    #[error("strike must be positive, got {0}")]
    NonPositiveStrike(f64),

    /// Premium must be a non-negative finite number.
    #[error("premium must be non-negative, got {0}")]
    NegativePremium(f64),

    /// Quantity must be at least one contract.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// Quantity outside the representable contract range.
    #[error("quantity must be at least 1, got {0}")]
    QuantityOutOfRange(i64),

    /// Unrecognized option type.
    #[error("unknown option type '{0}' (expected call or put)")]
    UnknownOptionType(String),

    /// Unrecognized side.
    #[error("unknown side '{0}' (expected long/buy or short/sell)")]
    UnknownPosition(String),
}

impl LegError {
    /// Wire name of the offending field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::NonPositiveStrike(_) => "strike",
            Self::NegativePremium(_) => "premium",
            Self::ZeroQuantity | Self::QuantityOutOfRange(_) => "quantity",
            Self::UnknownOptionType(_) => "option_type",
            Self::UnknownPosition(_) => "side",
        }
    }
}

/// Errors from strategy validation and payoff computation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StrategyError {
    /// A leg failed validation.
    #[error("invalid leg {index}: {source}")]
    InvalidLeg {
        /// Zero-based leg index in the request.
        index: usize,
        /// The violated invariant.
        source: LegError,
    },

    /// Request-level field is malformed or out of range.
    #[error("validation failed for '{field}': {message}")]
    Validation {
        /// Offending field.
        field: String,
        /// Error message.
        message: String,
    },

    /// The price grid cannot establish valid bounds.
    #[error("invalid price range: {message}")]
    InvalidRange {
        /// Error message.
        message: String,
    },
}

impl StrategyError {
    /// Shorthand for a request-level validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a price range error.
    pub fn invalid_range(message: impl Into<String>) -> Self {
        Self::InvalidRange {
            message: message.into(),
        }
    }
}
