//! Contract analysis.
//!
//! This module provides:
//! - Contract inputs and option type parsing
//! - Greeks values and the per-contract result record
//! - Risk classification
//! - The single-leg analyzer facade and batch analysis
//! - Straddle/strangle aggregation

mod analyzer;
mod batch;
mod expiry;
mod greeks;
mod multileg;
mod risk;
mod types;

pub use analyzer::SingleLegAnalyzer;
pub use batch::BatchConfig;
pub use expiry::days_to_expiry;
pub use greeks::{Greeks, GreeksResult, VolatilitySource};
pub use multileg::{
    Breakevens, CombinedLegResult, MultiLegCombinator, StrategyType, combine_results,
};
pub use risk::{RiskClassifier, RiskLevel, RiskThresholds};
pub use types::{ContractInput, OptionType};
