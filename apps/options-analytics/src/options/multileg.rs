//! Two-leg combinations: straddles and strangles.
//!
//! Each leg is analyzed independently, then the numeric fields are summed
//! and the more severe risk level wins.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::analyzer::SingleLegAnalyzer;
use super::greeks::{GreeksResult, VolatilitySource};
use super::types::{ContractInput, OptionType};
use crate::config::{AnalyticsConfig, ConfigError};
use crate::error::AnalyticsError;
use crate::observability;

/// Combination shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyType {
    /// Call and put at the same strike.
    Straddle,
    /// Call and put at different strikes.
    Strangle,
}

impl StrategyType {
    /// Lowercase label for logs and metrics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Straddle => "straddle",
            Self::Strangle => "strangle",
        }
    }
}

/// Expiry breakevens of a long combination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breakevens {
    /// PE strike less total premium.
    pub lower: f64,
    /// CE strike plus total premium.
    pub upper: f64,
}

/// Per-leg and combined analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedLegResult {
    /// Call leg.
    pub ce: GreeksResult,
    /// Put leg.
    pub pe: GreeksResult,
    /// Leg-wise aggregate.
    pub combined: GreeksResult,
    /// Straddle or strangle.
    pub strategy: StrategyType,
    /// Expiry breakevens.
    pub breakevens: Breakevens,
}

/// Builds straddle and strangle results from two contracts.
#[derive(Debug, Clone, Default)]
pub struct MultiLegCombinator {
    analyzer: SingleLegAnalyzer,
}

impl MultiLegCombinator {
    /// Create a combinator from a configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if the configuration is invalid.
    pub fn new(config: AnalyticsConfig) -> Result<Self, ConfigError> {
        SingleLegAnalyzer::new(config).map(Self::with_analyzer)
    }

    /// Create a combinator around an existing analyzer.
    #[must_use]
    pub const fn with_analyzer(analyzer: SingleLegAnalyzer) -> Self {
        Self { analyzer }
    }

    /// The per-leg analyzer.
    #[must_use]
    pub const fn analyzer(&self) -> &SingleLegAnalyzer {
        &self.analyzer
    }

    /// Analyze a straddle.
    ///
    /// # Errors
    ///
    /// Fails if either leg fails validation or has the wrong option type.
    pub fn straddle(
        &self,
        ce: &ContractInput,
        pe: &ContractInput,
    ) -> Result<CombinedLegResult, AnalyticsError> {
        self.combine(StrategyType::Straddle, ce, pe)
    }

    /// Analyze a strangle. Strike ordering is not enforced.
    ///
    /// # Errors
    ///
    /// Fails if either leg fails validation or has the wrong option type.
    pub fn strangle(
        &self,
        ce: &ContractInput,
        pe: &ContractInput,
    ) -> Result<CombinedLegResult, AnalyticsError> {
        self.combine(StrategyType::Strangle, ce, pe)
    }

    #[tracing::instrument(skip_all, fields(strategy = strategy.label()))]
    fn combine(
        &self,
        strategy: StrategyType,
        ce: &ContractInput,
        pe: &ContractInput,
    ) -> Result<CombinedLegResult, AnalyticsError> {
        let start = Instant::now();

        check_leg(OptionType::Call, ce.option_type)?;
        check_leg(OptionType::Put, pe.option_type)?;

        let ce_result = self.analyzer.analyze(ce)?;
        let pe_result = self.analyzer.analyze(pe)?;
        let combined = combine_results(&ce_result, &pe_result);

        let breakevens = Breakevens {
            lower: pe.strike_price - combined.market_price,
            upper: ce.strike_price + combined.market_price,
        };

        info!(
            ce_strike = ce.strike_price,
            pe_strike = pe.strike_price,
            premium = combined.market_price,
            delta = combined.delta,
            risk = %combined.risk_level,
            "Combination analyzed"
        );
        observability::record_strategy_build(strategy.label(), start.elapsed().as_secs_f64());

        Ok(CombinedLegResult {
            ce: ce_result,
            pe: pe_result,
            combined,
            strategy,
            breakevens,
        })
    }
}

fn check_leg(expected: OptionType, actual: OptionType) -> Result<(), AnalyticsError> {
    if expected == actual {
        Ok(())
    } else {
        Err(AnalyticsError::LegMismatch {
            leg: expected.leg_label(),
            expected,
            actual,
        })
    }
}

/// Aggregate two leg results.
///
/// Greeks and premiums are summed, risk takes the more severe leg, and
/// volatilities are vega-weighted (simple mean when total vega is zero).
#[must_use]
pub fn combine_results(ce: &GreeksResult, pe: &GreeksResult) -> GreeksResult {
    let greeks = ce.greeks().add(&pe.greeks());
    let market_price = ce.market_price + pe.market_price;
    let theoretical_price = ce.theoretical_price + pe.theoretical_price;

    let iv_converged = ce.iv_converged && pe.iv_converged;
    let implied_volatility = match (ce.implied_volatility, pe.implied_volatility) {
        (Some(ce_iv), Some(pe_iv)) if iv_converged => {
            Some(vega_weighted(ce_iv, pe_iv, ce.vega, pe.vega))
        }
        _ => None,
    };

    GreeksResult {
        delta: greeks.delta,
        gamma: greeks.gamma,
        theta: greeks.theta,
        vega: greeks.vega,
        rho: greeks.rho,
        theoretical_price,
        price_difference: market_price - theoretical_price,
        volatility_used: vega_weighted(ce.volatility_used, pe.volatility_used, ce.vega, pe.vega),
        implied_volatility,
        iv_converged,
        iv_used_fallback: ce.iv_used_fallback || pe.iv_used_fallback,
        historical_volatility: ce.historical_volatility.or(pe.historical_volatility),
        risk_level: ce.risk_level.max_severity(pe.risk_level),
        market_price,
        volatility_source: least_informed(ce.volatility_source, pe.volatility_source),
        iv_iterations: ce.iv_iterations.saturating_add(pe.iv_iterations),
    }
}

fn vega_weighted(a: f64, b: f64, vega_a: f64, vega_b: f64) -> f64 {
    let total = vega_a + vega_b;
    if total > 0.0 {
        (a * vega_a + b * vega_b) / total
    } else {
        (a + b) / 2.0
    }
}

fn least_informed(a: VolatilitySource, b: VolatilitySource) -> VolatilitySource {
    a.min(b)
}
