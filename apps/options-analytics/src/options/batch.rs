//! Batch analysis of independent contracts.
//!
//! Small batches run sequentially; larger ones fan out over rayon's global
//! pool. Output order always matches input order.

use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::analyzer::SingleLegAnalyzer;
use super::greeks::GreeksResult;
use super::types::ContractInput;
use crate::error::AnalyticsError;
use crate::observability;

/// Configuration for batch analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Minimum parallelization threshold (batches below this run sequentially).
    pub min_parallel_batch: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            min_parallel_batch: 32,
        }
    }
}

impl SingleLegAnalyzer {
    /// Analyze many contracts. Each item succeeds or fails on its own.
    pub fn analyze_batch(
        &self,
        inputs: &[ContractInput],
    ) -> Vec<Result<GreeksResult, AnalyticsError>> {
        let start = Instant::now();
        let parallel = inputs.len() >= self.batch.min_parallel_batch;

        let results: Vec<_> = if parallel {
            inputs.par_iter().map(|input| self.analyze(input)).collect()
        } else {
            inputs.iter().map(|input| self.analyze(input)).collect()
        };

        let failures = results.iter().filter(|r| r.is_err()).count();
        info!(
            size = inputs.len(),
            failures,
            parallel,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Batch analysis complete"
        );
        observability::record_batch(inputs.len(), failures, parallel);

        results
    }
}
