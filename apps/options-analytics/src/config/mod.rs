//! Configuration module for the analytics engine.
//!
//! Every tunable (solver tolerances and bounds, risk bands, fallback
//! volatility, batch parallelism) lives in an explicit [`AnalyticsConfig`]
//! passed to constructors, so differently tuned engines can run side by side.
//!
//! # Usage
//!
//! ```rust,ignore
//! use options_analytics::config::{AnalyticsConfig, load_config};
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Or start from defaults
//! let config = AnalyticsConfig::default();
//! println!("IV tolerance: {}", config.solver.price_tolerance);
//! ```

mod observability;
mod pricing;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use observability::{LoggingConfig, ObservabilityConfig};
pub use pricing::PricingConfig;

pub use crate::options::{BatchConfig, RiskThresholds};
pub use crate::pricing::IvSolverConfig;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AnalyticsConfig {
    /// Volatility fallback and annualization.
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Implied volatility solver.
    #[serde(default)]
    pub solver: IvSolverConfig,
    /// Risk classification bands.
    #[serde(default)]
    pub risk: RiskThresholds,
    /// Batch analysis.
    #[serde(default)]
    pub batch: BatchConfig,
    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
///
/// # Errors
///
/// Returns a `ConfigError` if the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<AnalyticsConfig, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
///
/// # Errors
///
/// Returns a `ConfigError` if the YAML cannot be parsed or validated.
pub fn load_config_from_string(yaml: &str) -> Result<AnalyticsConfig, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let config: AnalyticsConfig = serde_yaml_bw::from_str(&interpolated)?;
    validate_config(&config)?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_env_vars(input: &str) -> String {
    use std::sync::OnceLock;

    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let mut result = input.to_string();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    for cap in re.captures_iter(input) {
        let Some(full_match) = cap.get(0) else {
            continue;
        };
        let Some(var_match) = cap.get(1) else {
            continue;
        };
        let full_match = full_match.as_str();
        let var_name = var_match.as_str();
        let default_value = cap.get(2).map(|m| m.as_str());

        let value = match std::env::var(var_name) {
            Ok(v) if !v.is_empty() => v,
            _ => default_value.map_or_else(String::new, str::to_string),
        };

        result = result.replace(full_match, &value);
    }

    result
}

/// Validate configuration values.
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` describing the first bad value.
pub fn validate_config(config: &AnalyticsConfig) -> Result<(), ConfigError> {
    let solver = &config.solver;
    if solver.max_iterations == 0 {
        return Err(invalid("solver.max_iterations must be at least 1"));
    }
    if !is_positive(solver.price_tolerance) {
        return Err(invalid("solver.price_tolerance must be positive"));
    }
    if !is_positive(solver.min_vol)
        || !is_positive(solver.max_vol)
        || solver.max_vol <= solver.min_vol
    {
        return Err(invalid(
            "solver volatility bounds must satisfy 0 < min_vol < max_vol",
        ));
    }
    if solver.min_vega.is_nan() || solver.min_vega < 0.0 {
        return Err(invalid("solver.min_vega must not be negative"));
    }
    if !(solver.min_vol..=solver.max_vol).contains(&solver.initial_guess) {
        return Err(invalid(
            "solver.initial_guess must lie within [min_vol, max_vol]",
        ));
    }

    let pricing = &config.pricing;
    if !is_positive(pricing.default_volatility) {
        return Err(invalid("pricing.default_volatility must be positive"));
    }
    if !is_positive(pricing.trading_days_per_year) {
        return Err(invalid("pricing.trading_days_per_year must be positive"));
    }

    let risk = &config.risk;
    if risk.danger_days.is_nan()
        || risk.caution_days.is_nan()
        || risk.danger_days < 0.0
        || risk.caution_days < risk.danger_days
    {
        return Err(invalid(
            "risk bands must satisfy 0 <= danger_days <= caution_days",
        ));
    }
    if !is_positive(risk.gamma_exposure_threshold) || !is_positive(risk.vega_exposure_threshold) {
        return Err(invalid("risk exposure thresholds must be positive"));
    }

    match config.observability.logging.format.as_str() {
        "json" | "pretty" => Ok(()),
        other => Err(invalid(&format!(
            "observability.logging.format must be 'json' or 'pretty', got '{other}'"
        ))),
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}
