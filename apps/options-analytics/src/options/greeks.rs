//! Greeks values and per-contract analysis results.
//!
//! Provides the Greeks struct for option sensitivities, the volatility
//! source tag, and the `GreeksResult` record returned to the dashboard.

use serde::{Deserialize, Serialize};

use super::risk::RiskLevel;
use crate::pricing::PricingOutput;

/// Greeks for an option or combination.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Greeks {
    /// Delta - rate of change of option price with respect to underlying price.
    /// Range: -1.0 to 1.0 for individual options.
    pub delta: f64,
    /// Gamma - rate of change of delta with respect to underlying price.
    pub gamma: f64,
    /// Theta - rate of change of option price with respect to time (per day).
    /// Typically negative for long options.
    pub theta: f64,
    /// Vega - sensitivity to implied volatility (per 1% change in IV).
    pub vega: f64,
    /// Rho - sensitivity to interest rate changes (per 1% change in rates).
    pub rho: f64,
}

impl Greeks {
    /// Create new Greeks.
    #[must_use]
    pub const fn new(delta: f64, gamma: f64, theta: f64, vega: f64, rho: f64) -> Self {
        Self {
            delta,
            gamma,
            theta,
            vega,
            rho,
        }
    }

    /// Add another Greeks to this one.
    #[must_use]
    pub fn add(&self, other: &Self) -> Self {
        Self {
            delta: self.delta + other.delta,
            gamma: self.gamma + other.gamma,
            theta: self.theta + other.theta,
            vega: self.vega + other.vega,
            rho: self.rho + other.rho,
        }
    }
}

impl From<&PricingOutput> for Greeks {
    fn from(out: &PricingOutput) -> Self {
        Self::new(out.delta, out.gamma, out.theta, out.vega, out.rho)
    }
}

/// Which branch of the fallback chain supplied the pricing volatility.
///
/// Ordered from least to most informed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolatilitySource {
    /// Configured default volatility.
    Default,
    /// Historical volatility from the spot series.
    Historical,
    /// Converged implied volatility.
    Implied,
}

/// Full analysis of one contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GreeksResult {
    /// Delta.
    pub delta: f64,
    /// Gamma.
    pub gamma: f64,
    /// Theta per calendar day.
    pub theta: f64,
    /// Vega per vol point.
    pub vega: f64,
    /// Rho per rate point.
    pub rho: f64,
    /// Model premium at `volatility_used`.
    pub theoretical_price: f64,
    /// `market_price - theoretical_price`.
    pub price_difference: f64,
    /// Volatility fed into the pricing model. Always positive.
    pub volatility_used: f64,
    /// Converged implied volatility, if any.
    pub implied_volatility: Option<f64>,
    /// Whether the IV solve converged.
    pub iv_converged: bool,
    /// Whether `volatility_used` is anything other than a converged IV.
    pub iv_used_fallback: bool,
    /// Historical volatility, if a usable series was supplied.
    pub historical_volatility: Option<f64>,
    /// Position risk classification.
    pub risk_level: RiskLevel,
    /// Observed premium (echoed).
    pub market_price: f64,
    /// Source of `volatility_used`.
    pub volatility_source: VolatilitySource,
    /// IV solver iterations spent.
    pub iv_iterations: u32,
}

impl GreeksResult {
    /// The sensitivity block.
    #[must_use]
    pub const fn greeks(&self) -> Greeks {
        Greeks::new(self.delta, self.gamma, self.theta, self.vega, self.rho)
    }
}
