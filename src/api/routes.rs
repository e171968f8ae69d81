//! API route definitions
//!
//! - /api/v1/optimize  - Blend search
//! - /api/v1/aft       - Single-analysis AFT
//! - /api/v1/normalize - Property header normalization
//! - /api/v1/config    - Active limits
//! - /api/v1/health    - Liveness and worker availability

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, ApiState};

/// Create all versioned API routes
pub fn api_routes(state: ApiState) -> Router {
    Router::new()
        .route("/optimize", post(handlers::optimize))
        .route("/aft", post(handlers::aft))
        .route("/normalize", post(handlers::normalize))
        .route("/config", get(handlers::get_config))
        .route("/health", get(handlers::health_check))
        .with_state(state)
}

/// Health endpoint at root level for load balancers
pub fn root_routes(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .with_state(state)
}
