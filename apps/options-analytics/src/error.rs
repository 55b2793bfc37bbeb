//! Error handling for the analytics engine.
//!
//! Only invalid input is an error. Solver non-convergence, missing price
//! history and near-expiry degeneracy all degrade into flagged fallback
//! values on the result instead.
//!
//! # Reason Codes
//!
//! | Reason | Cause |
//! |--------|-------|
//! | `INVALID_SPOT_PRICE` | Spot not positive or not finite |
//! | `INVALID_STRIKE_PRICE` | Strike not positive or not finite |
//! | `INVALID_MARKET_PRICE` | Negative or non-finite premium |
//! | `INVALID_DAYS_TO_EXPIRY` | Negative or non-finite expiry |
//! | `INVALID_RISK_FREE_RATE` | Non-finite rate |
//! | `UNKNOWN_OPTION_TYPE` | Option type string not recognised |
//! | `LEG_MISMATCH` | Call supplied as PE leg or put as CE leg |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::options::OptionType;

/// Errors raised before any numeric work is done.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// A contract field failed validation.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Offending input field.
        field: &'static str,
        /// Error message.
        message: String,
    },

    /// Option type string was not a recognised call/put label.
    #[error("Unknown option type: '{0}' (expected call/put, c/p or CE/PE)")]
    UnknownOptionType(String),

    /// A combination leg has the wrong option type.
    #[error("{leg} leg must be a {expected}, got {actual}")]
    LegMismatch {
        /// Leg label (`CE` or `PE`).
        leg: &'static str,
        /// Required option type.
        expected: OptionType,
        /// Supplied option type.
        actual: OptionType,
    },
}

impl AnalyticsError {
    /// Build a validation error for a named field.
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Stable reason string for API consumers.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation { field, .. } => match *field {
                "spot_price" => "INVALID_SPOT_PRICE",
                "strike_price" => "INVALID_STRIKE_PRICE",
                "market_price" => "INVALID_MARKET_PRICE",
                "days_to_expiry" => "INVALID_DAYS_TO_EXPIRY",
                "risk_free_rate" => "INVALID_RISK_FREE_RATE",
                _ => "INVALID_REQUEST",
            },
            Self::UnknownOptionType(_) => "UNKNOWN_OPTION_TYPE",
            Self::LegMismatch { .. } => "LEG_MISMATCH",
        }
    }
}

/// Serializable error payload for the result consumer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Reason code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

impl From<&AnalyticsError> for ErrorPayload {
    fn from(err: &AnalyticsError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}
