//! Core BlendOptimizer: exhaustive search over integer blend percentages

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::defaults::{
    DEFAULT_MAX_COALS, DEFAULT_MAX_COMBINATIONS, DEFAULT_TIME_BUDGET_MS,
};
use crate::normalizer::normalize_request;
use crate::types::{BlendCandidate, BlendRequest, CoalInput, OptimizationResult, OptimizationStats};

use super::enumerator::CombinationSpace;
use super::error::OptimizerError;
use super::projection::{project_current, standalone_afts};
use super::scoring::{evaluate_blend, select};

/// The deadline is polled once per this many combinations.
const DEADLINE_CHECK_INTERVAL: u64 = 4096;

/// Per-call resource limits. Read-only and passed by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptimizerLimits {
    /// Maximum number of coals in one request
    pub max_coals: usize,
    /// Ceiling on feasible combinations
    pub max_combinations: u64,
    /// Wall-clock budget for the enumeration
    pub time_budget: Duration,
}

impl Default for OptimizerLimits {
    fn default() -> Self {
        Self {
            max_coals: DEFAULT_MAX_COALS,
            max_combinations: DEFAULT_MAX_COMBINATIONS,
            time_budget: Duration::from_millis(DEFAULT_TIME_BUDGET_MS),
        }
    }
}

/// Candidates of one search, in enumeration order.
#[derive(Debug, Clone)]
pub struct CandidateSet {
    pub candidates: Vec<BlendCandidate>,
    pub stats: OptimizationStats,
}

/// Blend optimizer.
///
/// Stateless apart from its limits; one instance can serve any number of calls
/// from any thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlendOptimizer {
    limits: OptimizerLimits,
}

impl BlendOptimizer {
    pub fn new(limits: OptimizerLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &OptimizerLimits {
        &self.limits
    }

    /// Normalize a raw request and optimize it, carrying the normalization warnings
    /// into the result.
    pub fn optimize_request(&self, request: &BlendRequest) -> Result<OptimizationResult, OptimizerError> {
        let normalized = normalize_request(request)?;
        let mut result = self.optimize(&normalized.coals)?;
        result.warnings = normalized.warnings;
        Ok(result)
    }

    /// Run the full search and select the three reported blends.
    pub fn optimize(&self, coals: &[CoalInput]) -> Result<OptimizationResult, OptimizerError> {
        let CandidateSet { candidates, stats } = self.candidates(coals)?;

        let Some((selection, table)) = select(&candidates) else {
            debug!(coals = coals.len(), "No feasible blend");
            return Err(OptimizerError::Infeasible);
        };

        debug!(
            coals = coals.len(),
            combinations = stats.combinations_evaluated,
            elapsed_ms = stats.elapsed_ms,
            aft_min = table.aft.min,
            aft_max = table.aft.max,
            cost_min = table.cost.min,
            cost_max = table.cost.max,
            "Blend optimization complete"
        );

        Ok(OptimizationResult {
            best_aft: candidates[selection.best_aft].clone(),
            cheapest: candidates[selection.cheapest].clone(),
            balanced: candidates[selection.balanced].clone(),
            current: project_current(coals),
            per_coal_aft: standalone_afts(coals),
            warnings: Vec::new(),
            stats,
        })
    }

    /// Evaluate every feasible combination.
    ///
    /// An empty set is not an error here; [`optimize`](Self::optimize) turns it
    /// into [`OptimizerError::Infeasible`].
    pub fn candidates(&self, coals: &[CoalInput]) -> Result<CandidateSet, OptimizerError> {
        let started = Instant::now();
        self.validate(coals)?;

        let space = CombinationSpace::new(coals.iter().map(|c| c.bounds).collect());
        let limit = self.limits.max_combinations;

        let found = space.count();
        if found > u128::from(limit) {
            warn!(coals = coals.len(), combinations = %found, limit, "Search space exceeds combination limit");
            return Err(OptimizerError::CombinationLimit { found, limit });
        }
        debug!(coals = coals.len(), combinations = %found, "Enumerating blend combinations");

        let deadline = started + self.limits.time_budget;
        let mut candidates = Vec::with_capacity(usize::try_from(found).unwrap_or(0));
        let mut evaluated: u64 = 0;

        for combo in space.iter() {
            if evaluated >= limit {
                warn!(limit, "Combination guard tripped during enumeration");
                return Err(OptimizerError::CombinationLimit {
                    found: u128::from(evaluated) + 1,
                    limit,
                });
            }
            if evaluated > 0 && evaluated % DEADLINE_CHECK_INTERVAL == 0 && Instant::now() >= deadline {
                let budget_ms = duration_ms(self.limits.time_budget);
                warn!(budget_ms, evaluated, "Blend optimization timed out");
                return Err(OptimizerError::Timeout { budget_ms });
            }

            let percentages = combo.into_iter().map(f64::from).collect();
            candidates.push(evaluate_blend(coals, percentages));
            evaluated += 1;
        }

        Ok(CandidateSet {
            candidates,
            stats: OptimizationStats {
                combinations_evaluated: evaluated,
                elapsed_ms: duration_ms(started.elapsed()),
            },
        })
    }

    fn validate(&self, coals: &[CoalInput]) -> Result<(), OptimizerError> {
        if coals.is_empty() {
            return Err(OptimizerError::Input("blend list is empty".into()));
        }
        if coals.len() > self.limits.max_coals {
            return Err(OptimizerError::Input(format!(
                "{} coals given, at most {} are supported",
                coals.len(),
                self.limits.max_coals
            )));
        }
        if let Some(index) = coals.iter().position(|c| c.name.trim().is_empty()) {
            return Err(OptimizerError::Input(format!("coal #{index} has a blank name")));
        }
        Ok(())
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
