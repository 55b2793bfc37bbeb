//! Request DTOs
//!
//! Records as the dashboard sends them: option types are free-form strings
//! and expiry may come as a timestamp instead of a day count.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;
use crate::options::{ContractInput, OptionType, days_to_expiry};

/// DTO for one contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRequestDto {
    /// Spot price.
    pub spot_price: f64,
    /// Strike price.
    pub strike_price: f64,
    /// Observed premium.
    pub market_price: f64,
    /// Option type (`call`/`c`/`ce`, `put`/`p`/`pe`).
    pub option_type: String,
    /// Days to expiry. Takes precedence over `expiry`.
    #[serde(default)]
    pub days_to_expiry: Option<f64>,
    /// Expiry timestamp.
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
    /// Risk-free rate.
    pub risk_free_rate: f64,
    /// Attempt an IV solve.
    #[serde(default = "default_use_implied_volatility")]
    pub use_implied_volatility: bool,
    /// Spot history for the HV fallback.
    #[serde(default)]
    pub historical_spot_prices: Option<Vec<f64>>,
}

const fn default_use_implied_volatility() -> bool {
    true
}

impl ContractRequestDto {
    /// Convert to a domain input, resolving `expiry` against `now`.
    ///
    /// # Errors
    ///
    /// Fails on an unrecognized option type or when neither
    /// `daysToExpiry` nor `expiry` is present.
    pub fn to_domain(&self, now: DateTime<Utc>) -> Result<ContractInput, AnalyticsError> {
        let option_type: OptionType = self.option_type.parse()?;

        let days = match (self.days_to_expiry, self.expiry) {
            (Some(days), _) => days,
            (None, Some(expiry)) => days_to_expiry(expiry, now),
            (None, None) => {
                return Err(AnalyticsError::validation(
                    "days_to_expiry",
                    "either daysToExpiry or expiry is required",
                ));
            }
        };

        let mut input = ContractInput::new(
            self.spot_price,
            self.strike_price,
            self.market_price,
            option_type,
            days,
            self.risk_free_rate,
        )
        .with_implied_volatility(self.use_implied_volatility);
        input.historical_spot_prices.clone_from(&self.historical_spot_prices);
        Ok(input)
    }
}

impl TryFrom<&ContractRequestDto> for ContractInput {
    type Error = AnalyticsError;

    fn try_from(dto: &ContractRequestDto) -> Result<Self, Self::Error> {
        dto.to_domain(Utc::now())
    }
}

/// Analysis request, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnalysisRequestDto {
    /// One contract.
    Single {
        /// The contract.
        contract: ContractRequestDto,
    },
    /// Same-strike call and put.
    Straddle {
        /// Call leg.
        ce: ContractRequestDto,
        /// Put leg.
        pe: ContractRequestDto,
    },
    /// Different-strike call and put.
    Strangle {
        /// Call leg.
        ce: ContractRequestDto,
        /// Put leg.
        pe: ContractRequestDto,
    },
    /// Independent contracts.
    Batch {
        /// The contracts.
        contracts: Vec<ContractRequestDto>,
    },
}
