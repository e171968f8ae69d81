//! Optimizer error type

use thiserror::Error;

use crate::normalizer::NormalizeError;

/// Why an optimization produced no result.
///
/// Every variant is recoverable; the HTTP layer maps each one to its own status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptimizerError {
    /// Structurally invalid input (empty list, blank name, too many coals)
    #[error("invalid input: {0}")]
    Input(String),

    /// Bounds admit no combination summing to 100
    #[error("no valid blends: the percentage bounds admit no combination summing to 100")]
    Infeasible,

    /// Search space larger than the configured ceiling
    #[error("search space has {found} combinations, limit is {limit}; narrow the min/max bounds")]
    CombinationLimit { found: u128, limit: u64 },

    /// Enumeration overran its deadline
    #[error("optimization exceeded its {budget_ms} ms time budget")]
    Timeout { budget_ms: u64 },
}

impl OptimizerError {
    /// True for the limits that guard the service rather than reject the input.
    pub fn is_resource_exhaustion(&self) -> bool {
        matches!(self, Self::CombinationLimit { .. } | Self::Timeout { .. })
    }
}

impl From<NormalizeError> for OptimizerError {
    fn from(err: NormalizeError) -> Self {
        Self::Input(err.to_string())
    }
}
