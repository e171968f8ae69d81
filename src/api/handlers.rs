//! API route handlers
//!
//! - `POST /optimize`: full blend search
//! - `POST /aft`: AFT of a single ash analysis
//! - `POST /normalize`: header folding and value coercion only
//! - `GET /config`: active optimizer limits
//! - `GET /health`: liveness and worker availability

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, warn};

use super::envelope::ApiErrorResponse;
use super::workers::{OptimizerPool, PoolError};
use crate::config::BlendConfig;
use crate::normalizer::normalize_properties;
use crate::optimization::{calculate_aft, AftRegime, BlendOptimizer, OptimizerError};
use crate::types::{BlendRequest, Oxide, OxideVector, PropertiesRequest};

// ============================================================================
// API State
// ============================================================================

/// Shared state for API handlers
#[derive(Debug, Clone)]
pub struct ApiState {
    /// Optimizer worker pool
    pub pool: OptimizerPool,
    /// Configuration the service was started with
    pub config: Arc<BlendConfig>,
}

impl ApiState {
    /// Build state from a loaded config, sizing the pool from `optimizer.workers`.
    pub fn from_config(config: BlendConfig) -> Self {
        let optimizer = BlendOptimizer::new(config.optimizer.limits());
        let pool = OptimizerPool::new(optimizer, config.optimizer.resolved_workers());
        Self {
            pool,
            config: Arc::new(config),
        }
    }
}

/// Map a body that failed to parse as JSON; oversized bodies keep their 413.
fn rejection_response(rejection: &JsonRejection) -> Response {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiErrorResponse::payload_too_large(rejection.body_text())
    } else {
        ApiErrorResponse::bad_request(rejection.body_text())
    }
}

/// Map a pooled optimization failure to its HTTP response.
fn pool_error_response(err: &PoolError) -> Response {
    match err {
        PoolError::Optimizer(e @ OptimizerError::Input(_)) => ApiErrorResponse::bad_request(e.to_string()),
        PoolError::Optimizer(e @ OptimizerError::Infeasible) => ApiErrorResponse::not_found(e.to_string()),
        PoolError::Optimizer(e) if e.is_resource_exhaustion() => {
            ApiErrorResponse::search_limit_exceeded(e.to_string())
        }
        PoolError::Optimizer(e) => ApiErrorResponse::internal(e.to_string()),
        PoolError::Closed => ApiErrorResponse::service_unavailable(err.to_string()),
        PoolError::Task(_) => ApiErrorResponse::internal(err.to_string()),
    }
}

// ============================================================================
// Optimize
// ============================================================================

/// POST /api/v1/optimize
pub async fn optimize(
    State(state): State<ApiState>,
    payload: Result<Json<BlendRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(p) => p,
        Err(rejection) => return rejection_response(&rejection),
    };

    let rows = request.blends.len();
    match state.pool.run(request).await {
        Ok(result) => {
            info!(
                coals = rows,
                combinations = result.stats.combinations_evaluated,
                elapsed_ms = result.stats.elapsed_ms,
                warnings = result.warnings.len(),
                "Blend optimized"
            );
            (StatusCode::OK, Json(result)).into_response()
        }
        Err(e) => {
            warn!(coals = rows, error = %e, "Blend optimization rejected");
            pool_error_response(&e)
        }
    }
}

// ============================================================================
// AFT & Normalize
// ============================================================================

#[derive(Debug, Serialize)]
pub struct AftResponse {
    pub predicted_aft: f64,
    pub regime: AftRegime,
    /// Canonical oxide values the prediction used
    pub oxides: BTreeMap<&'static str, f64>,
    pub warnings: Vec<String>,
}

/// POST /api/v1/aft
pub async fn aft(payload: Result<Json<PropertiesRequest>, JsonRejection>) -> Response {
    let Json(request) = match payload {
        Ok(p) => p,
        Err(rejection) => return rejection_response(&rejection),
    };

    let props = normalize_properties(&request.properties);
    let oxides: OxideVector = props.oxides();
    let mut warnings = props.warnings.clone();
    let missing = props.missing_oxides();
    if !missing.is_empty() {
        let labels: Vec<&str> = missing.iter().map(|o| o.label()).collect();
        warnings.push(format!("missing {} (using 0)", labels.join(", ")));
    }

    let body = AftResponse {
        predicted_aft: calculate_aft(&oxides),
        regime: AftRegime::for_oxides(&oxides),
        oxides: Oxide::ALL
            .into_iter()
            .map(|o| (o.label(), oxides.get(o)))
            .collect(),
        warnings,
    };
    (StatusCode::OK, Json(body)).into_response()
}

#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub properties: BTreeMap<&'static str, f64>,
    pub unrecognized: Vec<String>,
    pub warnings: Vec<String>,
}

/// POST /api/v1/normalize
pub async fn normalize(payload: Result<Json<PropertiesRequest>, JsonRejection>) -> Response {
    let Json(request) = match payload {
        Ok(p) => p,
        Err(rejection) => return rejection_response(&rejection),
    };

    let props = normalize_properties(&request.properties);
    let body = NormalizeResponse {
        properties: props.to_canonical_map(),
        unrecognized: props.unrecognized,
        warnings: props.warnings,
    };
    (StatusCode::OK, Json(body)).into_response()
}

// ============================================================================
// Config & Health
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub max_coals: usize,
    pub max_combinations: u64,
    pub time_budget_ms: u64,
    /// Effective worker count (after resolving `0`)
    pub workers: usize,
    pub max_body_bytes: usize,
}

/// GET /api/v1/config
pub async fn get_config(State(state): State<ApiState>) -> Json<ConfigResponse> {
    let o = &state.config.optimizer;
    Json(ConfigResponse {
        max_coals: o.max_coals,
        max_combinations: o.max_combinations,
        time_budget_ms: o.time_budget_ms,
        workers: state.pool.capacity(),
        max_body_bytes: state.config.server.max_body_bytes,
    })
}

#[derive(Debug, Serialize)]
pub struct WorkerStatus {
    pub capacity: usize,
    pub available: usize,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub workers: WorkerStatus,
}

/// GET /health and /api/v1/health
pub async fn health_check(State(state): State<ApiState>) -> Response {
    let workers = WorkerStatus {
        capacity: state.pool.capacity(),
        available: state.pool.available(),
    };
    let (code, status) = if state.pool.is_closed() {
        (StatusCode::SERVICE_UNAVAILABLE, "shutting_down")
    } else {
        (StatusCode::OK, "ok")
    };
    let body = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        workers,
    };
    (code, Json(body)).into_response()
}
