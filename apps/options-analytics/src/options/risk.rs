//! Position risk classification.
//!
//! Days to expiry sets the base level; outsized gamma or vega relative to
//! spot escalates it by one step. Thresholds are per-instrument
//! configuration (index options and single stocks warrant different bands).

use serde::{Deserialize, Serialize};

use super::greeks::Greeks;

/// Risk level, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Comfortable time to expiry, ordinary sensitivities.
    Safe = 0,
    /// Approaching expiry or elevated sensitivity.
    Caution = 1,
    /// Near expiry; premium can swing violently.
    Danger = 2,
}

impl RiskLevel {
    /// One step more severe, saturating at `Danger`.
    #[must_use]
    pub const fn escalate(self) -> Self {
        match self {
            Self::Safe => Self::Caution,
            Self::Caution | Self::Danger => Self::Danger,
        }
    }

    /// The more severe of two levels.
    #[must_use]
    pub fn max_severity(self, other: Self) -> Self {
        self.max(other)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Safe => write!(f, "safe"),
            Self::Caution => write!(f, "caution"),
            Self::Danger => write!(f, "danger"),
        }
    }
}

/// Classification bands.
///
/// Black-Scholes vega exposure is `phi(d1) * sqrt(T) / 100`, so with the
/// default `vega_exposure_threshold` near-the-money contracts beyond roughly
/// 1.6 years to expiry escalate to caution on tenor alone. Raise the threshold
/// for books holding LEAPS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskThresholds {
    /// Below this many days to expiry: danger.
    pub danger_days: f64,
    /// Below this many days to expiry: caution.
    pub caution_days: f64,
    /// Escalate when `|gamma| * spot / 100` (delta change on a 1% move) exceeds this.
    pub gamma_exposure_threshold: f64,
    /// Escalate when `|vega| / spot` (premium change per vol point, as a
    /// fraction of spot) exceeds this.
    pub vega_exposure_threshold: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            danger_days: 3.0,
            caution_days: 10.0,
            gamma_exposure_threshold: 0.25,
            vega_exposure_threshold: 0.005,
        }
    }
}

/// Maps expiry and Greeks to a [`RiskLevel`].
#[derive(Debug, Clone, Default)]
pub struct RiskClassifier {
    thresholds: RiskThresholds,
}

impl RiskClassifier {
    /// Create a classifier with the given bands.
    #[must_use]
    pub const fn new(thresholds: RiskThresholds) -> Self {
        Self { thresholds }
    }

    /// Classify a position.
    #[must_use]
    pub fn classify(&self, days_to_expiry: f64, spot: f64, greeks: &Greeks) -> RiskLevel {
        let base = if days_to_expiry < self.thresholds.danger_days {
            RiskLevel::Danger
        } else if days_to_expiry < self.thresholds.caution_days {
            RiskLevel::Caution
        } else {
            RiskLevel::Safe
        };

        if self.is_high_sensitivity(spot, greeks) {
            base.escalate()
        } else {
            base
        }
    }

    /// Whether gamma or vega is outsized relative to spot.
    #[must_use]
    pub fn is_high_sensitivity(&self, spot: f64, greeks: &Greeks) -> bool {
        if spot <= 0.0 {
            return false;
        }
        let gamma_exposure = greeks.gamma.abs() * spot / 100.0;
        let vega_exposure = greeks.vega.abs() / spot;
        gamma_exposure > self.thresholds.gamma_exposure_threshold
            || vega_exposure > self.thresholds.vega_exposure_threshold
    }
}
