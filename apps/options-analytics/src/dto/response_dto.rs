//! Response DTOs

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, ErrorPayload};
use crate::options::{CombinedLegResult, GreeksResult};

/// Outcome of one batch item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItemDto {
    /// Position in the request.
    pub index: usize,
    /// Analysis, when the item succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GreeksResult>,
    /// Error, when the item failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

impl BatchItemDto {
    /// Build from an item outcome.
    #[must_use]
    pub fn from_outcome(index: usize, outcome: Result<GreeksResult, AnalyticsError>) -> Self {
        match outcome {
            Ok(result) => Self {
                index,
                result: Some(result),
                error: None,
            },
            Err(e) => Self {
                index,
                result: None,
                error: Some(ErrorPayload::from(&e)),
            },
        }
    }
}

/// Analysis response, tagged by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnalysisResponseDto {
    /// One contract.
    Single {
        /// The analysis.
        result: GreeksResult,
    },
    /// Straddle or strangle.
    Combination {
        /// The analysis.
        result: CombinedLegResult,
    },
    /// Independent contracts.
    Batch {
        /// Per-item outcomes, in request order.
        items: Vec<BatchItemDto>,
        /// Items that failed.
        failed: usize,
    },
}
