//! Pricing model configuration for volatility selection.

use serde::{Deserialize, Serialize};

use crate::pricing::DEFAULT_TRADING_DAYS_PER_YEAR;

/// Pricing model configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Volatility used when neither IV nor HV is available.
    #[serde(default = "default_volatility")]
    pub default_volatility: f64,
    /// Trading days per year for annualizing historical volatility.
    #[serde(default = "default_trading_days_per_year")]
    pub trading_days_per_year: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            default_volatility: default_volatility(),
            trading_days_per_year: default_trading_days_per_year(),
        }
    }
}

const fn default_volatility() -> f64 {
    0.20
}

const fn default_trading_days_per_year() -> f64 {
    DEFAULT_TRADING_DAYS_PER_YEAR
}
