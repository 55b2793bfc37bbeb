//! Implied Volatility Solver
//!
//! Inverts Black-Scholes for volatility with a small explicit state machine:
//! - Newton-Raphson: fast convergence near the money, using raw vega as the derivative
//! - Bisection: takes over for the remaining budget when a Newton step leaves
//!   the volatility bounds or vega is too small to trust
//!
//! Every model evaluation narrows the `[low, high]` bracket (price is monotone
//! in volatility), so bisection resumes from what Newton already learned.
//!
//! Failing to converge is a normal outcome, reported as
//! [`IvSolution::NotConverged`] rather than an error.

// Black-Scholes uses standard mathematical notation (s, k, t, r, sigma)
#![allow(clippy::many_single_char_names)]

use serde::{Deserialize, Serialize};

use super::black_scholes::{self, MIN_TIME_TO_EXPIRY};
use crate::options::{ContractInput, OptionType};

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the IV solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IvSolverConfig {
    /// Iteration budget shared by Newton and bisection.
    pub max_iterations: u32,
    /// Convergence tolerance (absolute premium error).
    pub price_tolerance: f64,
    /// Minimum volatility bound (0.001 = 0.1%).
    pub min_vol: f64,
    /// Maximum volatility bound (5.0 = 500%).
    pub max_vol: f64,
    /// Raw vega below which Newton hands over to bisection.
    pub min_vega: f64,
    /// Seed when no historical volatility is available.
    pub initial_guess: f64,
}

impl Default for IvSolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            price_tolerance: 0.01,
            min_vol: 0.001,
            max_vol: 5.0,
            min_vega: 1e-8,
            initial_guess: 0.20,
        }
    }
}

// ============================================================================
// Outcomes
// ============================================================================

/// Method that produced a converged volatility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverMethod {
    /// Newton-Raphson on vega.
    NewtonRaphson,
    /// Bisection over the bracket.
    Bisection,
}

/// Why the solver stopped without a volatility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NonConvergence {
    /// Zero premium carries no volatility information.
    NoPremium,
    /// Under one hour to expiry, premium is pure intrinsic.
    Expired,
    /// Premium violates static no-arbitrage bounds.
    OutsideArbitrageBounds {
        /// Lower bound.
        lower: f64,
        /// Upper bound.
        upper: f64,
    },
    /// Premium is not reachable by any volatility in `[min_vol, max_vol]`.
    Unattainable {
        /// Model premium at `min_vol`.
        min_price: f64,
        /// Model premium at `max_vol`.
        max_price: f64,
    },
    /// Iteration budget exhausted.
    BudgetExhausted {
        /// Last absolute premium error.
        last_error: f64,
    },
}

/// Result of an IV solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IvSolution {
    /// A volatility reproducing the market premium within tolerance.
    Converged {
        /// Implied volatility.
        iv: f64,
        /// Iterations used.
        iterations: u32,
        /// Method in use when convergence was reached.
        method: SolverMethod,
    },
    /// No volatility found; callers fall back.
    NotConverged {
        /// Iterations used.
        iterations: u32,
        /// Stop reason.
        reason: NonConvergence,
    },
}

impl IvSolution {
    /// The implied volatility, if converged.
    #[must_use]
    pub const fn iv(&self) -> Option<f64> {
        match self {
            Self::Converged { iv, .. } => Some(*iv),
            Self::NotConverged { .. } => None,
        }
    }

    /// Whether the solve converged.
    #[must_use]
    pub const fn converged(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }

    /// Iterations spent.
    #[must_use]
    pub const fn iterations(&self) -> u32 {
        match self {
            Self::Converged { iterations, .. } | Self::NotConverged { iterations, .. } => {
                *iterations
            }
        }
    }

    /// Short outcome label for logs and metrics.
    #[must_use]
    pub const fn outcome_label(&self) -> &'static str {
        match self {
            Self::Converged { .. } => "converged",
            Self::NotConverged { reason, .. } => match reason {
                NonConvergence::NoPremium => "no_premium",
                NonConvergence::Expired => "expired",
                NonConvergence::OutsideArbitrageBounds { .. } => "arbitrage_bounds",
                NonConvergence::Unattainable { .. } => "unattainable",
                NonConvergence::BudgetExhausted { .. } => "budget_exhausted",
            },
        }
    }
}

// ============================================================================
// Problem
// ============================================================================

/// Market inputs for one solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IvProblem {
    /// Observed premium.
    pub market_price: f64,
    /// Underlying price.
    pub spot: f64,
    /// Strike price.
    pub strike: f64,
    /// Time to expiry in years.
    pub t: f64,
    /// Risk-free rate.
    pub r: f64,
    /// Call or put.
    pub kind: OptionType,
}

impl IvProblem {
    /// Build a problem from a contract input.
    #[must_use]
    pub fn from_contract(input: &ContractInput) -> Self {
        Self {
            market_price: input.market_price,
            spot: input.spot_price,
            strike: input.strike_price,
            t: black_scholes::years_from_days(input.days_to_expiry),
            r: input.risk_free_rate,
            kind: input.option_type,
        }
    }

    fn model_price(&self, sigma: f64) -> f64 {
        black_scholes::price(self.spot, self.strike, self.t, self.r, sigma, self.kind)
    }

    fn raw_vega(&self, sigma: f64) -> f64 {
        black_scholes::raw_vega(self.spot, self.strike, self.t, self.r, sigma)
    }

    /// Static no-arbitrage bounds on the premium.
    #[must_use]
    pub fn arbitrage_bounds(&self) -> (f64, f64) {
        let discounted_strike = self.strike * (-self.r * self.t).exp();
        match self.kind {
            OptionType::Call => ((self.spot - discounted_strike).max(0.0), self.spot),
            OptionType::Put => ((discounted_strike - self.spot).max(0.0), discounted_strike),
        }
    }
}

// ============================================================================
// State Machine
// ============================================================================

/// Active phase of the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverPhase {
    /// Newton-Raphson steps.
    Newton,
    /// Bisection of the bracket.
    Bisection,
}

/// Outcome of a single state transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Estimate reproduces the premium within tolerance.
    Converged(f64),
    /// Keep stepping.
    Continue,
}

/// Solver state: bracket, current estimate, iteration count and phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverState {
    low: f64,
    high: f64,
    estimate: f64,
    iteration: u32,
    phase: SolverPhase,
    last_error: f64,
}

impl SolverState {
    /// Start in the Newton phase from a seed clamped into the bounds.
    #[must_use]
    pub fn new(seed: f64, config: &IvSolverConfig) -> Self {
        let seed = if seed.is_finite() {
            seed
        } else {
            config.initial_guess
        };
        Self {
            low: config.min_vol,
            high: config.max_vol,
            estimate: seed.clamp(config.min_vol, config.max_vol),
            iteration: 0,
            phase: SolverPhase::Newton,
            last_error: f64::INFINITY,
        }
    }

    /// Current volatility estimate.
    #[must_use]
    pub const fn estimate(&self) -> f64 {
        self.estimate
    }

    /// Current `(low, high)` bracket.
    #[must_use]
    pub const fn bracket(&self) -> (f64, f64) {
        (self.low, self.high)
    }

    /// Iterations consumed so far.
    #[must_use]
    pub const fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Active phase.
    #[must_use]
    pub const fn phase(&self) -> SolverPhase {
        self.phase
    }

    /// Absolute premium error of the last evaluation.
    #[must_use]
    pub const fn last_error(&self) -> f64 {
        self.last_error
    }

    /// Whether the iteration budget is spent.
    #[must_use]
    pub const fn exhausted(&self, config: &IvSolverConfig) -> bool {
        self.iteration >= config.max_iterations
    }

    /// Method label for the current phase.
    #[must_use]
    pub const fn method(&self) -> SolverMethod {
        match self.phase {
            SolverPhase::Newton => SolverMethod::NewtonRaphson,
            SolverPhase::Bisection => SolverMethod::Bisection,
        }
    }

    /// Advance one iteration.
    pub fn step(&mut self, problem: &IvProblem, config: &IvSolverConfig) -> StepOutcome {
        match self.phase {
            SolverPhase::Newton => self.newton_step(problem, config),
            SolverPhase::Bisection => self.bisection_step(problem, config),
        }
    }

    /// Evaluate the model at the estimate and tighten the bracket.
    fn evaluate(&mut self, problem: &IvProblem, config: &IvSolverConfig) -> Option<f64> {
        self.iteration += 1;
        let error = problem.model_price(self.estimate) - problem.market_price;
        self.last_error = error.abs();

        if self.last_error < config.price_tolerance {
            return None;
        }
        if error > 0.0 {
            self.high = self.high.min(self.estimate);
        } else {
            self.low = self.low.max(self.estimate);
        }
        Some(error)
    }

    fn newton_step(&mut self, problem: &IvProblem, config: &IvSolverConfig) -> StepOutcome {
        let Some(error) = self.evaluate(problem, config) else {
            return StepOutcome::Converged(self.estimate);
        };

        let vega = problem.raw_vega(self.estimate);
        if vega < config.min_vega {
            self.phase = SolverPhase::Bisection;
            return StepOutcome::Continue;
        }

        let next = self.estimate - error / vega;
        if !next.is_finite() || next < config.min_vol || next > config.max_vol {
            self.phase = SolverPhase::Bisection;
            return StepOutcome::Continue;
        }

        self.estimate = next;
        StepOutcome::Continue
    }

    fn bisection_step(&mut self, problem: &IvProblem, config: &IvSolverConfig) -> StepOutcome {
        self.estimate = self.low.midpoint(self.high);
        if self.evaluate(problem, config).is_none() {
            return StepOutcome::Converged(self.estimate);
        }

        // Bracket collapsed onto the root at machine precision
        if self.high - self.low < 1e-12 {
            return StepOutcome::Converged(self.estimate);
        }
        StepOutcome::Continue
    }
}

// ============================================================================
// Solver
// ============================================================================

/// Implied Volatility Solver.
#[derive(Debug, Clone, Default)]
pub struct IvSolver {
    config: IvSolverConfig,
}

impl IvSolver {
    /// Create a new IV solver with the given configuration.
    #[must_use]
    pub const fn new(config: IvSolverConfig) -> Self {
        Self { config }
    }

    /// Solve for the volatility reproducing a contract's market premium.
    ///
    /// `initial_guess` defaults to the configured seed.
    #[must_use]
    pub fn solve_contract(&self, input: &ContractInput, initial_guess: Option<f64>) -> IvSolution {
        self.solve(&IvProblem::from_contract(input), initial_guess)
    }

    /// Solve an [`IvProblem`].
    #[must_use]
    pub fn solve(&self, problem: &IvProblem, initial_guess: Option<f64>) -> IvSolution {
        if let Some(reason) = self.precheck(problem) {
            return IvSolution::NotConverged {
                iterations: 0,
                reason,
            };
        }

        let seed = initial_guess.unwrap_or(self.config.initial_guess);
        let mut state = SolverState::new(seed, &self.config);

        while !state.exhausted(&self.config) {
            if let StepOutcome::Converged(iv) = state.step(problem, &self.config) {
                return IvSolution::Converged {
                    iv,
                    iterations: state.iteration(),
                    method: state.method(),
                };
            }
        }

        IvSolution::NotConverged {
            iterations: state.iteration(),
            reason: NonConvergence::BudgetExhausted {
                last_error: state.last_error(),
            },
        }
    }

    /// Reasons to skip iterating altogether.
    fn precheck(&self, problem: &IvProblem) -> Option<NonConvergence> {
        if problem.market_price <= 0.0 {
            return Some(NonConvergence::NoPremium);
        }
        if problem.t < MIN_TIME_TO_EXPIRY {
            return Some(NonConvergence::Expired);
        }

        let (lower, upper) = problem.arbitrage_bounds();
        let tolerance = self.config.price_tolerance;
        if problem.market_price < lower - tolerance || problem.market_price > upper + tolerance {
            return Some(NonConvergence::OutsideArbitrageBounds { lower, upper });
        }

        let min_price = problem.model_price(self.config.min_vol);
        let max_price = problem.model_price(self.config.max_vol);
        if problem.market_price < min_price - tolerance
            || problem.market_price > max_price + tolerance
        {
            return Some(NonConvergence::Unattainable {
                min_price,
                max_price,
            });
        }
        None
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() < tolerance
    }

    /// Tight tolerance so recovered vols can be checked precisely.
    fn precise_solver() -> IvSolver {
        IvSolver::new(IvSolverConfig {
            price_tolerance: 1e-8,
            ..IvSolverConfig::default()
        })
    }

    fn problem(s: f64, k: f64, t: f64, r: f64, sigma: f64, kind: OptionType) -> IvProblem {
        IvProblem {
            market_price: black_scholes::price(s, k, t, r, sigma, kind),
            spot: s,
            strike: k,
            t,
            r,
            kind,
        }
    }

    fn expect_iv(solution: IvSolution) -> f64 {
        match solution {
            IvSolution::Converged { iv, .. } => iv,
            IvSolution::NotConverged { reason, .. } => {
                panic!("IV solver should converge, stopped with {reason:?}")
            }
        }
    }

    #[test]
    fn test_iv_solver_atm_call() {
        let p = problem(100.0, 100.0, 1.0, 0.05, 0.25, OptionType::Call);
        let iv = expect_iv(precise_solver().solve(&p, None));
        assert!(approx_eq(iv, 0.25, 1e-6));
    }

    #[test]
    fn test_iv_solver_atm_put() {
        let p = problem(100.0, 100.0, 0.5, 0.03, 0.30, OptionType::Put);
        let iv = expect_iv(precise_solver().solve(&p, None));
        assert!(approx_eq(iv, 0.30, 1e-6));
    }

    #[test]
    fn test_iv_solver_otm_call() {
        let p = problem(100.0, 130.0, 0.25, 0.05, 0.35, OptionType::Call);
        let iv = expect_iv(precise_solver().solve(&p, None));
        assert!(approx_eq(iv, 0.35, 1e-4));
    }

    #[test]
    fn test_iv_solver_itm_put() {
        let p = problem(100.0, 120.0, 0.5, 0.04, 0.28, OptionType::Put);
        let iv = expect_iv(precise_solver().solve(&p, None));
        assert!(approx_eq(iv, 0.28, 1e-4));
    }

    #[test]
    fn test_iv_solver_high_iv() {
        let p = problem(50.0, 50.0, 0.1, 0.05, 1.50, OptionType::Call);
        let iv = expect_iv(precise_solver().solve(&p, None));
        assert!(approx_eq(iv, 1.50, 1e-4));
    }

    #[test]
    fn test_iv_solver_low_iv() {
        let p = problem(100.0, 100.0, 1.0, 0.02, 0.08, OptionType::Call);
        let iv = expect_iv(precise_solver().solve(&p, None));
        assert!(approx_eq(iv, 0.08, 1e-4));
    }

    #[test]
    fn test_nifty_weekly_call_converges_with_default_tolerance() {
        let p = IvProblem {
            market_price: 150.0,
            spot: 26100.0,
            strike: 26100.0,
            t: 5.0 / 365.0,
            r: 0.07,
            kind: OptionType::Call,
        };
        let solution = IvSolver::default().solve(&p, None);
        assert!(solution.converged());
        let iv = expect_iv(solution);
        assert!(iv > 0.10 && iv < 0.125);
        assert!(solution.iterations() <= 10);
    }

    #[test]
    fn test_zero_premium_is_not_solved() {
        let p = IvProblem {
            market_price: 0.0,
            ..problem(100.0, 100.0, 1.0, 0.05, 0.2, OptionType::Call)
        };
        let solution = IvSolver::default().solve(&p, None);
        assert_eq!(
            solution,
            IvSolution::NotConverged {
                iterations: 0,
                reason: NonConvergence::NoPremium
            }
        );
        assert_eq!(solution.iv(), None);
    }

    #[test]
    fn test_expired_contract_is_not_solved() {
        let p = IvProblem {
            market_price: 5.0,
            spot: 100.0,
            strike: 100.0,
            t: 0.0,
            r: 0.05,
            kind: OptionType::Call,
        };
        let solution = IvSolver::default().solve(&p, None);
        assert_eq!(solution.outcome_label(), "expired");
    }

    #[test]
    fn test_price_above_arbitrage_bound() {
        // A call can never be worth more than the underlying
        let p = IvProblem {
            market_price: 30000.0,
            spot: 26100.0,
            strike: 26100.0,
            t: 5.0 / 365.0,
            r: 0.07,
            kind: OptionType::Call,
        };
        let solution = IvSolver::default().solve(&p, None);
        assert!(!solution.converged());
        assert!(matches!(
            solution,
            IvSolution::NotConverged {
                iterations: 0,
                reason: NonConvergence::OutsideArbitrageBounds { .. }
            }
        ));
    }

    #[test]
    fn test_price_below_intrinsic() {
        let p = IvProblem {
            market_price: 15.0,
            spot: 120.0,
            strike: 100.0,
            t: 0.5,
            r: 0.05,
            kind: OptionType::Call,
        };
        assert_eq!(
            IvSolver::default().solve(&p, None).outcome_label(),
            "arbitrage_bounds"
        );
    }

    #[test]
    fn test_price_beyond_max_vol_is_unattainable() {
        // Within arbitrage bounds but needs more than 500% vol
        let p = IvProblem {
            market_price: 20000.0,
            spot: 26100.0,
            strike: 26100.0,
            t: 5.0 / 365.0,
            r: 0.07,
            kind: OptionType::Call,
        };
        assert_eq!(
            IvSolver::default().solve(&p, None).outcome_label(),
            "unattainable"
        );
    }

    #[test]
    fn test_budget_exhaustion() {
        let solver = IvSolver::new(IvSolverConfig {
            max_iterations: 1,
            price_tolerance: 1e-10,
            ..IvSolverConfig::default()
        });
        let p = problem(100.0, 100.0, 1.0, 0.05, 0.45, OptionType::Call);
        match solver.solve(&p, Some(0.10)) {
            IvSolution::NotConverged {
                iterations,
                reason: NonConvergence::BudgetExhausted { last_error },
            } => {
                assert_eq!(iterations, 1);
                assert!(last_error > 0.0);
            }
            other => panic!("expected budget exhaustion, got {other:?}"),
        }
    }

    #[test]
    fn test_state_newton_step_narrows_bracket() {
        let config = IvSolverConfig::default();
        let p = problem(100.0, 100.0, 1.0, 0.05, 0.30, OptionType::Call);
        let mut state = SolverState::new(0.20, &config);

        assert_eq!(state.step(&p, &config), StepOutcome::Continue);
        assert_eq!(state.phase(), SolverPhase::Newton);
        assert_eq!(state.iteration(), 1);
        // Model under-prices at 0.20, so 0.20 becomes the lower bound
        assert_eq!(state.bracket(), (0.20, config.max_vol));
        assert!(state.estimate() > 0.20);
    }

    #[test]
    fn test_state_switches_to_bisection_on_tiny_vega() {
        let config = IvSolverConfig {
            min_vega: 1e6,
            ..IvSolverConfig::default()
        };
        let p = problem(100.0, 100.0, 1.0, 0.05, 0.30, OptionType::Call);
        let mut state = SolverState::new(0.20, &config);

        assert_eq!(state.step(&p, &config), StepOutcome::Continue);
        assert_eq!(state.phase(), SolverPhase::Bisection);
        assert_eq!(state.estimate(), 0.20);

        state.step(&p, &config);
        assert_eq!(state.estimate(), 0.20f64.midpoint(config.max_vol));
    }

    #[test]
    fn test_state_switches_to_bisection_when_step_leaves_bounds() {
        let config = IvSolverConfig {
            max_vol: 0.25,
            ..IvSolverConfig::default()
        };
        // True vol 0.24 from a tiny seed: the first Newton step overshoots max_vol
        let p = problem(100.0, 130.0, 0.25, 0.05, 0.24, OptionType::Call);
        let mut state = SolverState::new(0.01, &config);

        state.step(&p, &config);
        assert_eq!(state.phase(), SolverPhase::Bisection);

        let solver = IvSolver::new(config);
        let solution = solver.solve(&p, Some(0.01));
        assert!(matches!(
            solution,
            IvSolution::Converged {
                method: SolverMethod::Bisection,
                ..
            }
        ));
    }

    #[test]
    fn test_state_seed_is_clamped() {
        let config = IvSolverConfig::default();
        assert_eq!(SolverState::new(50.0, &config).estimate(), config.max_vol);
        assert_eq!(SolverState::new(0.0, &config).estimate(), config.min_vol);
        assert_eq!(
            SolverState::new(f64::NAN, &config).estimate(),
            config.initial_guess
        );
    }

    #[test]
    fn test_solution_serializes_tagged() {
        let solution = IvSolution::Converged {
            iv: 0.2,
            iterations: 3,
            method: SolverMethod::NewtonRaphson,
        };
        let json = serde_json::to_value(solution).unwrap();
        assert_eq!(json["status"], "converged");
        assert_eq!(json["method"], "newton_raphson");
    }

    proptest! {
        #[test]
        fn prop_round_trip_recovers_volatility(
            moneyness in 0.9f64..1.1,
            days in 30.0f64..365.0,
            sigma in 0.15f64..1.2,
            is_call in any::<bool>(),
        ) {
            let kind = if is_call { OptionType::Call } else { OptionType::Put };
            let p = problem(100.0, 100.0 * moneyness, days / 365.0, 0.05, sigma, kind);
            let solution = precise_solver().solve(&p, None);
            prop_assert!(solution.converged(), "no convergence: {:?}", solution);
            let iv = solution.iv().unwrap_or_default();
            let repriced = black_scholes::price(p.spot, p.strike, p.t, p.r, iv, kind);
            prop_assert!(approx_eq(repriced, p.market_price, 1e-7));
        }
    }
}
