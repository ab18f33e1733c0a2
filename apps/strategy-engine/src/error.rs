//! Rich error handling for the strategy engine.
//!
//! Domain errors are mapped onto a small set of stable error codes that the
//! HTTP adapter turns into status codes and JSON bodies.
//!
//! # HTTP Status Codes
//!
//! | Code | Status | Usage |
//! |------|--------|-------|
//! | `INVALID_REQUEST` | 422 | Empty legs, bad spot price, malformed field |
//! | `INVALID_LEG` | 422 | Leg violates strike/premium/quantity invariants |
//! | `INVALID_RANGE` | 422 | Price grid cannot establish bounds |
//! | `CATALOG_UNAVAILABLE` | 503 | Option chain provider failed |
//! | `INTERNAL_ERROR` | 500 | Unexpected numeric fault |

use std::collections::BTreeMap;

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::strategy::StrategyError;

/// Error codes for the strategy engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Invalid request format or out-of-range request field.
    InvalidRequest,
    /// A leg failed validation.
    InvalidLeg,
    /// Price grid bounds could not be established.
    InvalidRange,
    /// Option chain catalog could not be read.
    CatalogUnavailable,
    /// Internal fault.
    InternalError,
}

impl ErrorCode {
    /// HTTP status for this error.
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest | Self::InvalidLeg | Self::InvalidRange => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::CatalogUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::InvalidLeg => "INVALID_LEG",
            Self::InvalidRange => "INVALID_RANGE",
            Self::CatalogUnavailable => "CATALOG_UNAVAILABLE",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// A rich error with context.
#[derive(Debug, Error)]
#[error("[{code}] {message}")]
pub struct EngineError {
    code: ErrorCode,
    message: String,
    context: Vec<(String, String)>,
}

impl EngineError {
    /// Create a new error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: Vec::new(),
        }
    }

    /// Add context to the error.
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((key.into(), value.into()));
        self
    }

    /// Error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Context pairs.
    #[must_use]
    pub fn context(&self) -> &[(String, String)] {
        &self.context
    }

    /// Internal fault. The message is generic; details belong in the logs.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Option chain provider failure.
    #[must_use]
    pub fn catalog_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::CatalogUnavailable, message)
    }

    /// Convert to the JSON error body.
    #[must_use]
    pub fn to_http_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.code.reason().to_string(),
            message: self.message.clone(),
            details: self.context.iter().cloned().collect(),
        }
    }
}

impl From<StrategyError> for EngineError {
    fn from(err: StrategyError) -> Self {
        let message = err.to_string();
        match err {
            StrategyError::InvalidLeg { index, source } => Self::new(ErrorCode::InvalidLeg, message)
                .with_context("leg_index", index.to_string())
                .with_context("field", source.field())
                .with_context("reason", source.to_string()),
            StrategyError::Validation { field, .. } => {
                Self::new(ErrorCode::InvalidRequest, message).with_context("field", field)
            }
            StrategyError::InvalidRange { .. } => Self::new(ErrorCode::InvalidRange, message),
        }
    }
}

/// JSON error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Stable error code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Additional context.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, String>,
}
