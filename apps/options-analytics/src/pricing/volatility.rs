//! Historical volatility from a spot price series.
//!
//! Close-to-close estimator: sample standard deviation of log returns,
//! annualized by the square root of trading days per year.

use tracing::debug;

/// Default trading days per year for annualization.
pub const DEFAULT_TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Annualized close-to-close volatility estimator.
#[derive(Debug, Clone, Copy)]
pub struct HistoricalVolatilityEstimator {
    trading_days_per_year: f64,
}

impl Default for HistoricalVolatilityEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_TRADING_DAYS_PER_YEAR)
    }
}

impl HistoricalVolatilityEstimator {
    /// Create an estimator with the given annualization basis.
    #[must_use]
    pub const fn new(trading_days_per_year: f64) -> Self {
        Self {
            trading_days_per_year,
        }
    }

    /// Estimate annualized volatility.
    ///
    /// Non-positive and non-finite prices are skipped. Returns `None` with
    /// fewer than two usable prices or when every return is zero.
    #[must_use]
    pub fn estimate(&self, prices: &[f64]) -> Option<f64> {
        let returns = log_returns(prices);
        if returns.is_empty() {
            debug!(prices = prices.len(), "Not enough usable prices for historical volatility");
            return None;
        }

        let per_period = if returns.len() == 1 {
            returns[0].abs()
        } else {
            sample_std_dev(&returns)?
        };

        if per_period <= 0.0 || !per_period.is_finite() {
            debug!(returns = returns.len(), "Degenerate return series, no historical volatility");
            return None;
        }

        let annualized = per_period * self.trading_days_per_year.sqrt();
        if annualized.is_finite() && annualized > 0.0 {
            Some(annualized)
        } else {
            debug!(
                trading_days_per_year = self.trading_days_per_year,
                "Annualization basis yields no usable volatility"
            );
            None
        }
    }
}

/// Log returns between consecutive usable prices.
fn log_returns(prices: &[f64]) -> Vec<f64> {
    let usable: Vec<f64> = prices
        .iter()
        .copied()
        .filter(|p| p.is_finite() && *p > 0.0)
        .collect();

    usable.windows(2).map(|w| (w[1] / w[0]).ln()).collect()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values)?;
    let variance_sum: f64 = values.iter().map(|v| (v - avg) * (v - avg)).sum();
    Some((variance_sum / (values.len() - 1) as f64).sqrt())
}
