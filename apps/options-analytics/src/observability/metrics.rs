//! Metrics for Greeks computation, IV solves and combinations.
//!
//! # Example
//!
//! ```ignore
//! use options_analytics::observability::record_greeks_computation;
//!
//! record_greeks_computation("black_scholes", "success", 0.0001, 4);
//! ```

use metrics::{counter, histogram};

// ============================================================================
// Greeks Computation Metrics
// ============================================================================

/// Record a Greeks computation.
///
/// # Arguments
///
/// * `model` - Pricing model (e.g., `"black_scholes"`)
/// * `status` - Computation status (`"success"` or `"error"`)
/// * `duration_seconds` - Computation time in seconds
/// * `iterations` - Number of IV solver iterations spent
pub fn record_greeks_computation(
    model: &str,
    status: &str,
    duration_seconds: f64,
    iterations: u32,
) {
    histogram!(
        "greeks_computation_seconds",
        "model" => model.to_string()
    )
    .record(duration_seconds);

    counter!(
        "greeks_computations_total",
        "model" => model.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        "iv_solver_iterations",
        "model" => model.to_string()
    )
    .record(f64::from(iterations));
}

/// Record the outcome of an implied volatility solve.
///
/// # Arguments
///
/// * `outcome` - Outcome label (e.g., `"converged"`, `"budget_exhausted"`)
pub fn record_iv_solve(outcome: &'static str) {
    counter!("iv_solves_total", "outcome" => outcome).increment(1);
}

// ============================================================================
// Combination Metrics
// ============================================================================

/// Record a two-leg combination build.
///
/// # Arguments
///
/// * `strategy_type` - Strategy type (`"straddle"` or `"strangle"`)
/// * `duration_seconds` - Build time in seconds
pub fn record_strategy_build(strategy_type: &str, duration_seconds: f64) {
    histogram!(
        "strategy_build_seconds",
        "strategy_type" => strategy_type.to_string()
    )
    .record(duration_seconds);
}

/// Record a batch run.
pub fn record_batch(size: usize, failures: usize, parallel: bool) {
    let mode = if parallel { "parallel" } else { "sequential" };
    histogram!("analysis_batch_size", "mode" => mode).record(size as f64);
    counter!("analysis_batch_failures_total").increment(failures as u64);
}

// ============================================================================
// Tests
// ============================================================================
