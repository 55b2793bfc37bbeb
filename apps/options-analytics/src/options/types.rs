//! Core contract input types.
//!
//! Defines the option type (call/put) and the per-contract analysis request
//! supplied by the market data collaborator.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    /// Call option (right to buy).
    Call,
    /// Put option (right to sell).
    Put,
}

impl OptionType {
    /// Intrinsic value at the given spot.
    #[must_use]
    pub fn intrinsic(self, spot: f64, strike: f64) -> f64 {
        match self {
            Self::Call => (spot - strike).max(0.0),
            Self::Put => (strike - spot).max(0.0),
        }
    }

    /// Exchange leg label (`CE` / `PE`).
    #[must_use]
    pub const fn leg_label(self) -> &'static str {
        match self {
            Self::Call => "CE",
            Self::Put => "PE",
        }
    }
}

impl std::fmt::Display for OptionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "Call"),
            Self::Put => write!(f, "Put"),
        }
    }
}

impl FromStr for OptionType {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "call" | "c" | "ce" => Ok(Self::Call),
            "put" | "p" | "pe" => Ok(Self::Put),
            _ => Err(AnalyticsError::UnknownOptionType(s.to_string())),
        }
    }
}

/// One option contract's analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractInput {
    /// Current underlying price.
    pub spot_price: f64,
    /// Strike price.
    pub strike_price: f64,
    /// Observed option premium.
    pub market_price: f64,
    /// Call or put.
    pub option_type: OptionType,
    /// Calendar days until expiry (fractional).
    pub days_to_expiry: f64,
    /// Annualized risk-free rate in decimal form (0.07 = 7%).
    pub risk_free_rate: f64,
    /// Attempt an implied volatility solve before falling back.
    #[serde(default = "default_use_implied_volatility")]
    pub use_implied_volatility: bool,
    /// Ordered spot history for the historical volatility fallback.
    #[serde(default)]
    pub historical_spot_prices: Option<Vec<f64>>,
}

const fn default_use_implied_volatility() -> bool {
    true
}

impl ContractInput {
    /// Create an input with IV solving enabled and no price history.
    #[must_use]
    pub const fn new(
        spot_price: f64,
        strike_price: f64,
        market_price: f64,
        option_type: OptionType,
        days_to_expiry: f64,
        risk_free_rate: f64,
    ) -> Self {
        Self {
            spot_price,
            strike_price,
            market_price,
            option_type,
            days_to_expiry,
            risk_free_rate,
            use_implied_volatility: true,
            historical_spot_prices: None,
        }
    }

    /// Attach historical spot prices.
    #[must_use]
    pub fn with_history(mut self, prices: Vec<f64>) -> Self {
        self.historical_spot_prices = Some(prices);
        self
    }

    /// Enable or disable the implied volatility solve.
    #[must_use]
    pub const fn with_implied_volatility(mut self, enabled: bool) -> Self {
        self.use_implied_volatility = enabled;
        self
    }

    /// Validate the input before any numeric work.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyticsError::Validation`] naming the first offending field.
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        require_finite("spot_price", self.spot_price)?;
        require_finite("strike_price", self.strike_price)?;
        require_finite("market_price", self.market_price)?;
        require_finite("days_to_expiry", self.days_to_expiry)?;
        require_finite("risk_free_rate", self.risk_free_rate)?;

        if self.spot_price <= 0.0 {
            return Err(AnalyticsError::validation(
                "spot_price",
                format!("must be positive, got: {}", self.spot_price),
            ));
        }
        if self.strike_price <= 0.0 {
            return Err(AnalyticsError::validation(
                "strike_price",
                format!("must be positive, got: {}", self.strike_price),
            ));
        }
        if self.market_price < 0.0 {
            return Err(AnalyticsError::validation(
                "market_price",
                format!("must not be negative, got: {}", self.market_price),
            ));
        }
        if self.days_to_expiry < 0.0 {
            return Err(AnalyticsError::validation(
                "days_to_expiry",
                format!("must not be negative, got: {}", self.days_to_expiry),
            ));
        }
        Ok(())
    }
}

fn require_finite(field: &'static str, value: f64) -> Result<(), AnalyticsError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AnalyticsError::validation(
            field,
            format!("must be a finite number, got: {value}"),
        ))
    }
}
