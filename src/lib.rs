//! Coal Blend: Ash Fusion Temperature prediction and blend optimization
//!
//! Finds integer percentage mixes of coal sources that maximize predicted
//! AFT, minimize cost, or balance the two.
//!
//! ## Architecture
//!
//! - **Normalizer**: folds lab-sheet headers (`SiO₂ (%)`, `silica`, ...) onto a
//!   canonical schema and coerces loosely typed values
//! - **Optimization**: AFT regression, combination enumerator, scoring and selection
//! - **API**: axum endpoints over a bounded blocking worker pool
//! - **Config**: TOML service settings and optimizer limits

pub mod api;
pub mod config;
pub mod normalizer;
pub mod optimization;
pub mod types;

// Re-export configuration
pub use config::BlendConfig;

// Re-export commonly used types
pub use types::{
    BlendCandidate, BlendRequest, CoalAft, CoalInput, OptimizationResult, OptimizationStats,
    Oxide, OxideVector, PercentBounds,
};

// Re-export the optimizer
pub use optimization::{calculate_aft, BlendOptimizer, OptimizerError, OptimizerLimits};
