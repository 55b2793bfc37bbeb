//! Single-contract analysis facade.
//!
//! Runs validation, historical volatility, the IV solve, pricing and risk
//! classification in a fixed order and assembles a [`GreeksResult`].

use std::time::Instant;

use tracing::{debug, warn};

use super::greeks::{Greeks, GreeksResult, VolatilitySource};
use super::risk::RiskClassifier;
use super::types::ContractInput;
use crate::config::{AnalyticsConfig, ConfigError, PricingConfig, validate_config};
use crate::error::AnalyticsError;
use crate::observability;
use crate::pricing::{
    HistoricalVolatilityEstimator, IvSolution, IvSolver, price_and_greeks, years_from_days,
};

use super::batch::BatchConfig;

/// Model label attached to metrics.
const MODEL: &str = "black_scholes";

/// Volatility picked for pricing, with its provenance.
#[derive(Debug, Clone, Copy, PartialEq)]
struct VolatilityChoice {
    volatility: f64,
    source: VolatilitySource,
}

/// Analyzes one option contract.
///
/// Holds only immutable configuration; share freely across threads.
#[derive(Debug, Clone)]
pub struct SingleLegAnalyzer {
    solver: IvSolver,
    historical: HistoricalVolatilityEstimator,
    classifier: RiskClassifier,
    pricing: PricingConfig,
    pub(super) batch: BatchConfig,
}

impl Default for SingleLegAnalyzer {
    fn default() -> Self {
        Self::from_validated(AnalyticsConfig::default())
    }
}

impl SingleLegAnalyzer {
    /// Create an analyzer from a configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if the configuration fails
    /// [`validate_config`].
    pub fn new(config: AnalyticsConfig) -> Result<Self, ConfigError> {
        validate_config(&config)?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: AnalyticsConfig) -> Self {
        Self {
            solver: IvSolver::new(config.solver),
            historical: HistoricalVolatilityEstimator::new(config.pricing.trading_days_per_year),
            classifier: RiskClassifier::new(config.risk),
            pricing: config.pricing,
            batch: config.batch,
        }
    }

    /// Analyze a contract.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::Validation` for non-positive spot or strike,
    /// negative premium or expiry, or any non-finite field. No numeric work
    /// happens in that case.
    #[tracing::instrument(
        skip_all,
        fields(
            option_type = %input.option_type,
            strike = input.strike_price,
            dte = input.days_to_expiry
        )
    )]
    pub fn analyze(&self, input: &ContractInput) -> Result<GreeksResult, AnalyticsError> {
        let start = Instant::now();

        if let Err(e) = input.validate() {
            warn!(code = e.code(), error = %e, "Rejected contract input");
            observability::record_greeks_computation(
                MODEL,
                "error",
                start.elapsed().as_secs_f64(),
                0,
            );
            return Err(e);
        }

        let historical_volatility = input
            .historical_spot_prices
            .as_deref()
            .and_then(|prices| self.historical.estimate(prices));

        let solution = if input.use_implied_volatility {
            let solution = self.solver.solve_contract(input, historical_volatility);
            observability::record_iv_solve(solution.outcome_label());
            if !solution.converged() {
                debug!(
                    outcome = solution.outcome_label(),
                    iterations = solution.iterations(),
                    "IV did not converge, falling back"
                );
            }
            Some(solution)
        } else {
            None
        };

        let choice = self.choose_volatility(solution.as_ref(), historical_volatility);

        let output = price_and_greeks(
            input.spot_price,
            input.strike_price,
            years_from_days(input.days_to_expiry),
            input.risk_free_rate,
            choice.volatility,
            input.option_type,
        );
        let greeks = Greeks::from(&output);
        let risk_level = self
            .classifier
            .classify(input.days_to_expiry, input.spot_price, &greeks);

        let iv_iterations = solution.as_ref().map_or(0, IvSolution::iterations);
        let result = GreeksResult {
            delta: greeks.delta,
            gamma: greeks.gamma,
            theta: greeks.theta,
            vega: greeks.vega,
            rho: greeks.rho,
            theoretical_price: output.price,
            price_difference: input.market_price - output.price,
            volatility_used: choice.volatility,
            implied_volatility: solution.as_ref().and_then(IvSolution::iv),
            iv_converged: solution.as_ref().is_some_and(IvSolution::converged),
            iv_used_fallback: choice.source != VolatilitySource::Implied,
            historical_volatility,
            risk_level,
            market_price: input.market_price,
            volatility_source: choice.source,
            iv_iterations,
        };

        debug!(
            volatility = result.volatility_used,
            source = ?result.volatility_source,
            theoretical = result.theoretical_price,
            risk = %result.risk_level,
            "Contract analyzed"
        );
        observability::record_greeks_computation(
            MODEL,
            "success",
            start.elapsed().as_secs_f64(),
            iv_iterations,
        );

        Ok(result)
    }

    /// Converged IV, else historical volatility, else the configured default.
    fn choose_volatility(
        &self,
        solution: Option<&IvSolution>,
        historical: Option<f64>,
    ) -> VolatilityChoice {
        if let Some(iv) = solution.and_then(IvSolution::iv) {
            return VolatilityChoice {
                volatility: iv,
                source: VolatilitySource::Implied,
            };
        }
        match historical {
            Some(hv) => VolatilityChoice {
                volatility: hv,
                source: VolatilitySource::Historical,
            },
            None => VolatilityChoice {
                volatility: self.pricing.default_volatility,
                source: VolatilitySource::Default,
            },
        }
    }
}
