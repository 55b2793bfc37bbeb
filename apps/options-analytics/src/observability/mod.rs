//! Observability module for metrics.
//!
//! Records through the `metrics` facade. No exporter is bundled; without an
//! installed recorder every call is a no-op.

mod metrics;

pub use metrics::{record_batch, record_greeks_computation, record_iv_solve, record_strategy_build};
