//! Blend Optimization Engine
//!
//! Enumerates every integer percentage mix of the input coals that sums to 100,
//! scores each one with the AFT regression and the linear cost/GCV model, and
//! picks the best-AFT, cheapest and balanced blends. Entirely synchronous;
//! callers that need concurrency run it on a blocking pool.

pub mod aft;
pub mod enumerator;
mod error;
mod optimizer;
mod projection;
pub mod scoring;

pub use aft::{calculate_aft, AftRegime};
pub use enumerator::{CombinationIter, CombinationSpace};
pub use error::OptimizerError;
pub use optimizer::{BlendOptimizer, CandidateSet, OptimizerLimits};
pub use projection::{project_current, standalone_afts};
