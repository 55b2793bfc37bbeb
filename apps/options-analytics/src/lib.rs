// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Options Analytics - Rust Core Library
//!
//! Black-Scholes pricing, Greeks, implied volatility and risk classification
//! for single option contracts and two-leg combinations.
//!
//! # Layout (leaf first)
//!
//! - **pricing**: closed-form price and Greeks, the IV solver, historical volatility
//! - **options**: contract inputs, risk classification, the single-leg
//!   analyzer, batch analysis, straddle/strangle aggregation
//! - **dto**: JSON request/response shapes at the process boundary
//! - **config**: YAML configuration with environment interpolation
//! - **observability**: metrics through the `metrics` facade
//! - **telemetry**: tracing subscriber setup (binary only)
//!
//! All analytics are pure and synchronous. Components hold only immutable
//! configuration and may be shared across threads.
//!
//! # Example
//!
//! ```rust,ignore
//! use options_analytics::{ContractInput, OptionType, SingleLegAnalyzer};
//!
//! let analyzer = SingleLegAnalyzer::default();
//! let input = ContractInput::new(26100.0, 26100.0, 150.0, OptionType::Call, 5.0, 0.07);
//! let result = analyzer.analyze(&input)?;
//! println!("IV {:?}, delta {:.3}", result.implied_volatility, result.delta);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Configuration loading and validation.
pub mod config;

/// Request/response DTOs.
pub mod dto;

/// Error types.
pub mod error;

/// Metrics recording.
pub mod observability;

/// Contract analysis, risk and combinations.
pub mod options;

/// Pricing model and volatility estimation.
pub mod pricing;

/// Tracing subscriber setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{AnalyticsConfig, ConfigError, load_config, load_config_from_string};
pub use error::{AnalyticsError, ErrorPayload};
pub use options::{
    Breakevens, CombinedLegResult, ContractInput, Greeks, GreeksResult, MultiLegCombinator,
    OptionType, RiskLevel, SingleLegAnalyzer, StrategyType, VolatilitySource,
};
pub use pricing::{IvSolution, IvSolver, PricingOutput, price_and_greeks};
