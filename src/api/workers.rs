//! Bounded pool for running optimizations off the async runtime
//!
//! Each search is CPU-bound and synchronous, so it runs under
//! `spawn_blocking`. A semaphore caps how many run at once; excess requests
//! wait for a permit rather than piling onto the blocking pool.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, error};

use crate::optimization::{BlendOptimizer, OptimizerError};
use crate::types::{BlendRequest, OptimizationResult};

/// Why a pooled optimization produced no result.
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("optimizer pool is shut down")]
    Closed,

    #[error("optimizer task failed: {0}")]
    Task(String),

    #[error(transparent)]
    Optimizer(#[from] OptimizerError),
}

/// Shared handle to the optimizer worker pool. Cheap to clone.
#[derive(Debug, Clone)]
pub struct OptimizerPool {
    optimizer: BlendOptimizer,
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl OptimizerPool {
    /// Pool running at most `workers` optimizations at a time (at least one).
    pub fn new(optimizer: BlendOptimizer, workers: usize) -> Self {
        let capacity = workers.max(1);
        Self {
            optimizer,
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn optimizer(&self) -> &BlendOptimizer {
        &self.optimizer
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits free right now.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    pub fn is_closed(&self) -> bool {
        self.permits.is_closed()
    }

    /// Stop accepting work. Running optimizations finish; waiting ones fail with `Closed`.
    pub fn close(&self) {
        self.permits.close();
    }

    /// Normalize and optimize a request on the blocking pool.
    pub async fn run(&self, request: BlendRequest) -> Result<OptimizationResult, PoolError> {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| PoolError::Closed)?;

        let optimizer = self.optimizer;
        let rows = request.blends.len();
        debug!(coals = rows, available = self.available(), "Optimization dispatched");

        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            optimizer.optimize_request(&request)
        });

        match handle.await {
            Ok(result) => result.map_err(PoolError::from),
            Err(e) => {
                error!(error = %e, "Optimizer task panicked or was cancelled");
                Err(PoolError::Task(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> BlendRequest {
        serde_json::from_value(json!({
            "blends": [
                { "coal": "A", "properties": { "SiO2": 50, "Al2O3": 20 }, "cost": 10 },
                { "coal": "B", "properties": { "SiO2": 40, "Al2O3": 25 }, "cost": 20 }
            ]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn runs_and_releases_permit() {
        let pool = OptimizerPool::new(BlendOptimizer::default(), 2);
        let result = pool.run(request()).await.unwrap();
        assert_eq!(result.stats.combinations_evaluated, 101);
        assert_eq!(pool.available(), 2);
    }

    #[tokio::test]
    async fn zero_workers_still_gets_one_permit() {
        let pool = OptimizerPool::new(BlendOptimizer::default(), 0);
        assert_eq!(pool.capacity(), 1);
        assert!(pool.run(request()).await.is_ok());
    }

    #[tokio::test]
    async fn closed_pool_rejects_work() {
        let pool = OptimizerPool::new(BlendOptimizer::default(), 1);
        pool.close();
        assert!(pool.is_closed());
        assert!(matches!(pool.run(request()).await, Err(PoolError::Closed)));
    }

    #[tokio::test]
    async fn optimizer_errors_pass_through() {
        let pool = OptimizerPool::new(BlendOptimizer::default(), 1);
        let err = pool.run(BlendRequest::default()).await.unwrap_err();
        assert!(matches!(err, PoolError::Optimizer(OptimizerError::Input(_))));
    }
}
