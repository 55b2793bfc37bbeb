//! Black-Scholes-Merton pricing and Greeks (no dividend yield).
//!
//! Unit conventions:
//! - `t` is in calendar years (`days / 365`)
//! - theta is per calendar day (annual theta / 365)
//! - vega is per 1 percentage point of volatility (raw vega / 100)
//! - rho is per 1 percentage point of rate (raw rho / 100)

// Black-Scholes uses standard mathematical notation (s, k, t, r, sigma)
#![allow(clippy::many_single_char_names)]

use std::f64::consts::{PI, SQRT_2};

use serde::{Deserialize, Serialize};

use crate::options::OptionType;

/// Calendar days per year for time-to-expiry and theta.
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Below one hour to expiry the option is priced at intrinsic value.
pub const MIN_TIME_TO_EXPIRY: f64 = 1.0 / (DAYS_PER_YEAR * 24.0);

/// Volatilities at or below this are treated as zero.
pub const MIN_VOLATILITY: f64 = 1e-8;

/// Convert calendar days to years.
#[must_use]
pub fn years_from_days(days: f64) -> f64 {
    days / DAYS_PER_YEAR
}

/// Standard normal CDF.
pub(crate) fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + libm::erf(x / SQRT_2))
}

/// Standard normal PDF.
pub(crate) fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Whether inputs are too close to expiry or zero vol for the closed form.
///
/// NaN in either argument counts as degenerate.
#[must_use]
pub fn is_degenerate(t: f64, sigma: f64) -> bool {
    t.is_nan() || sigma.is_nan() || t < MIN_TIME_TO_EXPIRY || sigma <= MIN_VOLATILITY
}

fn d1(s: f64, k: f64, t: f64, r: f64, sigma: f64) -> f64 {
    ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / (sigma * t.sqrt())
}

/// Theoretical price and Greeks for one option.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PricingOutput {
    /// Theoretical premium.
    pub price: f64,
    /// dV/dS.
    pub delta: f64,
    /// d²V/dS².
    pub gamma: f64,
    /// Time decay per calendar day.
    pub theta: f64,
    /// Per 1 vol point.
    pub vega: f64,
    /// Per 1 rate point.
    pub rho: f64,
}

/// Price and Greeks, falling back to intrinsic value when degenerate.
#[must_use]
pub fn price_and_greeks(
    s: f64,
    k: f64,
    t: f64,
    r: f64,
    sigma: f64,
    kind: OptionType,
) -> PricingOutput {
    if is_degenerate(t, sigma) {
        return intrinsic_output(s, k, kind);
    }

    let sqrt_t = t.sqrt();
    let d1 = d1(s, k, t, r, sigma);
    let d2 = d1 - sigma * sqrt_t;
    let df = (-r * t).exp();
    let pdf_d1 = norm_pdf(d1);

    let gamma = pdf_d1 / (s * sigma * sqrt_t);
    let vega = s * pdf_d1 * sqrt_t / 100.0;
    let decay = -s * pdf_d1 * sigma / (2.0 * sqrt_t);

    match kind {
        OptionType::Call => {
            let nd1 = norm_cdf(d1);
            let nd2 = norm_cdf(d2);
            PricingOutput {
                price: s * nd1 - k * df * nd2,
                delta: nd1,
                gamma,
                theta: (decay - k * r * df * nd2) / DAYS_PER_YEAR,
                vega,
                rho: k * t * df * nd2 / 100.0,
            }
        }
        OptionType::Put => {
            let n_minus_d1 = norm_cdf(-d1);
            let n_minus_d2 = norm_cdf(-d2);
            PricingOutput {
                price: k * df * n_minus_d2 - s * n_minus_d1,
                delta: norm_cdf(d1) - 1.0,
                gamma,
                theta: (decay + k * r * df * n_minus_d2) / DAYS_PER_YEAR,
                vega,
                rho: -k * t * df * n_minus_d2 / 100.0,
            }
        }
    }
}

/// Theoretical price only.
#[must_use]
pub fn price(s: f64, k: f64, t: f64, r: f64, sigma: f64, kind: OptionType) -> f64 {
    if is_degenerate(t, sigma) {
        return kind.intrinsic(s, k);
    }
    let sqrt_t = t.sqrt();
    let d1 = d1(s, k, t, r, sigma);
    let d2 = d1 - sigma * sqrt_t;
    let df = (-r * t).exp();
    match kind {
        OptionType::Call => s * norm_cdf(d1) - k * df * norm_cdf(d2),
        OptionType::Put => k * df * norm_cdf(-d2) - s * norm_cdf(-d1),
    }
}

/// Unscaled vega (dV/dσ per 1.0 of vol), same for calls and puts.
#[must_use]
pub fn raw_vega(s: f64, k: f64, t: f64, r: f64, sigma: f64) -> f64 {
    if is_degenerate(t, sigma) {
        return 0.0;
    }
    s * norm_pdf(d1(s, k, t, r, sigma)) * t.sqrt()
}

fn intrinsic_output(s: f64, k: f64, kind: OptionType) -> PricingOutput {
    let magnitude = if s == k {
        0.5
    } else {
        let in_the_money = match kind {
            OptionType::Call => s > k,
            OptionType::Put => s < k,
        };
        if in_the_money { 1.0 } else { 0.0 }
    };
    let delta = match kind {
        OptionType::Call => magnitude,
        OptionType::Put => -magnitude,
    };

    PricingOutput {
        price: kind.intrinsic(s, k),
        delta,
        ..PricingOutput::default()
    }
}
