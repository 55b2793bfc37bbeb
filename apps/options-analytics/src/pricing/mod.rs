//! Options pricing and volatility estimation.
//!
//! This module provides:
//! - Black-Scholes price and Greeks (calendar-day theta, per-point vega/rho)
//! - Implied volatility computation (Newton-Raphson with bisection fallback)
//! - Historical close-to-close volatility
//!
//! # Example
//!
//! ```ignore
//! use options_analytics::pricing::{IvSolver, IvProblem, OptionType};
//!
//! let solver = IvSolver::default();
//! let solution = solver.solve(&problem, None);
//! if let Some(iv) = solution.iv() {
//!     // ...
//! }
//! ```

pub mod black_scholes;
mod iv;
mod volatility;

pub use black_scholes::{PricingOutput, price_and_greeks, years_from_days};
pub use iv::{
    IvProblem, IvSolution, IvSolver, IvSolverConfig, NonConvergence, SolverMethod, SolverPhase,
    SolverState, StepOutcome,
};
pub use volatility::{DEFAULT_TRADING_DAYS_PER_YEAR, HistoricalVolatilityEstimator};

pub use crate::options::OptionType;
