//! Data Transfer Objects (DTOs)
//!
//! JSON shapes at the process boundary, and the dispatch from a request to
//! the analytics components.

mod request_dto;
mod response_dto;

use chrono::{DateTime, Utc};

pub use request_dto::{AnalysisRequestDto, ContractRequestDto};
pub use response_dto::{AnalysisResponseDto, BatchItemDto};

use crate::error::AnalyticsError;
use crate::options::MultiLegCombinator;

impl AnalysisRequestDto {
    /// Run the request.
    ///
    /// # Errors
    ///
    /// Single and combination requests fail as a whole. Batch requests
    /// never fail; per-item errors are reported in the response.
    pub fn execute(
        &self,
        combinator: &MultiLegCombinator,
        now: DateTime<Utc>,
    ) -> Result<AnalysisResponseDto, AnalyticsError> {
        match self {
            Self::Single { contract } => {
                let input = contract.to_domain(now)?;
                let result = combinator.analyzer().analyze(&input)?;
                Ok(AnalysisResponseDto::Single { result })
            }
            Self::Straddle { ce, pe } => {
                let result = combinator.straddle(&ce.to_domain(now)?, &pe.to_domain(now)?)?;
                Ok(AnalysisResponseDto::Combination { result })
            }
            Self::Strangle { ce, pe } => {
                let result = combinator.strangle(&ce.to_domain(now)?, &pe.to_domain(now)?)?;
                Ok(AnalysisResponseDto::Combination { result })
            }
            Self::Batch { contracts } => Ok(execute_batch(contracts, combinator, now)),
        }
    }
}

fn execute_batch(
    contracts: &[ContractRequestDto],
    combinator: &MultiLegCombinator,
    now: DateTime<Utc>,
) -> AnalysisResponseDto {
    let mut items: Vec<Option<BatchItemDto>> = vec![None; contracts.len()];
    let mut inputs = Vec::with_capacity(contracts.len());
    let mut positions = Vec::with_capacity(contracts.len());

    for (index, contract) in contracts.iter().enumerate() {
        match contract.to_domain(now) {
            Ok(input) => {
                inputs.push(input);
                positions.push(index);
            }
            Err(e) => items[index] = Some(BatchItemDto::from_outcome(index, Err(e))),
        }
    }

    let outcomes = combinator.analyzer().analyze_batch(&inputs);
    for (index, outcome) in positions.into_iter().zip(outcomes) {
        items[index] = Some(BatchItemDto::from_outcome(index, outcome));
    }

    let items: Vec<BatchItemDto> = items.into_iter().flatten().collect();
    let failed = items.iter().filter(|item| item.error.is_some()).count();
    AnalysisResponseDto::Batch { items, failed }
}
