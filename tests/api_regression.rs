//! API Regression Tests
//!
//! In-process tests that build the Axum app via `create_app()` and exercise
//! every endpoint using `tower::ServiceExt::oneshot()`.
//! No binary spawn, no network port.

use coal_blend::api::{create_app, ApiState};
use coal_blend::config::BlendConfig;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

fn create_test_state() -> ApiState {
    let mut config = BlendConfig::default();
    config.optimizer.workers = 2;
    ApiState::from_config(config)
}

async fn send(state: ApiState, req: Request<Body>) -> (StatusCode, Value) {
    let resp = create_app(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn get(state: ApiState, uri: &str) -> (StatusCode, Value) {
    send(state, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn post_json(state: ApiState, uri: &str, body: &Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(state, req).await
}

fn two_coal_request() -> Value {
    json!({
        "blends": [
            { "coal": "A", "min": 0, "max": 100, "current": 50, "cost": 10,
              "properties": { "SiO₂": 50, "Al2O3 (%)": 20, "Fe2O3": 5, "CaO": 3, "MgO": 1,
                              "Na2O": 0.5, "K2O": 0.5, "SO3": 1, "TiO2": 1, "GCV": 5200 } },
            { "coal": "B", "min": 0, "max": 100, "current": 50, "cost": 20,
              "properties": { "sio2": "40", "al2o3": 25, "fe2o3": 8, "cao": 6, "mgo": 2,
                              "na2o": 1, "k2o": 1, "so3": 2, "tio2": 1,
                              "Gross Calorific Value": "6100" } }
        ]
    })
}

fn assert_error_envelope(body: &Value, code: &str) {
    assert_eq!(body["error"]["code"], code, "body: {body}");
    assert!(body["error"]["message"].is_string());
    assert!(body["meta"]["timestamp"].is_string());
    assert!(body["meta"]["version"].is_string());
}

// ============================================================================
// Health & Config
// ============================================================================

#[tokio::test]
async fn test_health_endpoints_return_200() {
    for endpoint in ["/health", "/api/v1/health"] {
        let (status, body) = get(create_test_state(), endpoint).await;
        assert_eq!(status, StatusCode::OK, "GET {endpoint}");
        assert_eq!(body["status"], "ok");
        assert_eq!(body["workers"]["capacity"], 2);
        assert_eq!(body["workers"]["available"], 2);
    }
}

#[tokio::test]
async fn test_health_reports_shutdown_once_pool_closed() {
    let state = create_test_state();
    state.pool.close();
    let (status, body) = get(state, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "shutting_down");
}

#[tokio::test]
async fn test_config_reports_active_limits() {
    let (status, body) = get(create_test_state(), "/api/v1/config").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["max_coals"], 12);
    assert_eq!(body["max_combinations"], 250_000);
    assert_eq!(body["time_budget_ms"], 10_000);
    assert_eq!(body["workers"], 2);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (status, _) = get(create_test_state(), "/api/v1/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Optimize
// ============================================================================

#[tokio::test]
async fn test_optimize_returns_all_blends() {
    let (status, body) = post_json(create_test_state(), "/api/v1/optimize", &two_coal_request()).await;
    assert_eq!(status, StatusCode::OK, "body: {body}");

    for key in ["best_aft_blend", "cheapest_blend", "balanced_blend", "current_blend"] {
        let blend = &body[key];
        assert!(blend["blend"].is_array(), "{key} missing blend");
        assert!(blend["predicted_aft"].is_number());
        assert!(blend["cost"].is_number());
        assert!(blend["gcv"].is_number());
        assert_eq!(blend["blended_oxides"].as_array().unwrap().len(), 9);
    }

    assert_eq!(body["cheapest_blend"]["blend"], json!([100, 0]));
    assert_eq!(body["cheapest_blend"]["cost"], json!(10.0));
    assert_eq!(body["current_blend"]["blend"], json!([50, 50]));
    assert_eq!(body["individual_coal_afts"][0]["coal"], "A");
    assert_eq!(body["individual_coal_afts"][1]["coal"], "B");
    assert_eq!(body["stats"]["combinations_evaluated"], 101);
    assert!(body["warnings"].as_array().unwrap().is_empty(), "body: {body}");
}

#[tokio::test]
async fn test_optimize_reports_defaulted_fields() {
    let request = json!({
        "blends": [
            { "coal": "A", "properties": { "SiO2": 50, "Al2O3": 20 } },
            { "coal": "B", "properties": { "SiO2": 40, "Al2O3": 25 }, "cost": "n/a" }
        ]
    });
    let (status, body) = post_json(create_test_state(), "/api/v1/optimize", &request).await;
    assert_eq!(status, StatusCode::OK, "body: {body}");

    let warnings: Vec<&str> = body["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(warnings.iter().any(|w| w.starts_with("A: min missing")));
    assert!(warnings.iter().any(|w| w.starts_with("A: cost missing")));
    assert!(warnings.iter().any(|w| w.starts_with("B: cost value")));
    assert!(warnings.iter().any(|w| w.contains("missing Fe2O3")));
}

#[tokio::test]
async fn test_optimize_empty_list_is_400() {
    let (status, body) = post_json(create_test_state(), "/api/v1/optimize", &json!({ "blends": [] })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body, "BAD_REQUEST");
}

#[tokio::test]
async fn test_optimize_nameless_row_is_400() {
    let request = json!({ "blends": [ { "properties": { "SiO2": 50 } } ] });
    let (status, body) = post_json(create_test_state(), "/api/v1/optimize", &request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("no coal name"));
}

#[tokio::test]
async fn test_optimize_malformed_json_is_400() {
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/optimize")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ \"blends\": [ "))
        .unwrap();
    let (status, body) = send(create_test_state(), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body, "BAD_REQUEST");
}

#[tokio::test]
async fn test_optimize_infeasible_is_404() {
    let request = json!({
        "blends": [
            { "coal": "A", "min": 60, "max": 60, "properties": { "SiO2": 50 } },
            { "coal": "B", "min": 60, "max": 60, "properties": { "SiO2": 40 } }
        ]
    });
    let (status, body) = post_json(create_test_state(), "/api/v1/optimize", &request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error_envelope(&body, "NOT_FOUND");
    assert!(body["error"]["message"].as_str().unwrap().contains("no valid blends"));
}

#[tokio::test]
async fn test_optimize_over_combination_limit_is_422() {
    let mut config = BlendConfig::default();
    config.optimizer.max_combinations = 50;
    let state = ApiState::from_config(config);

    let (status, body) = post_json(state, "/api/v1/optimize", &two_coal_request()).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_error_envelope(&body, "SEARCH_LIMIT_EXCEEDED");
}

#[tokio::test]
async fn test_optimize_too_many_coals_is_400() {
    let mut config = BlendConfig::default();
    config.optimizer.max_coals = 1;
    let state = ApiState::from_config(config);

    let (status, body) = post_json(state, "/api/v1/optimize", &two_coal_request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"].as_str().unwrap().contains("at most 1"));
}

#[tokio::test]
async fn test_optimize_on_closed_pool_is_503() {
    let state = create_test_state();
    state.pool.close();
    let (status, body) = post_json(state, "/api/v1/optimize", &two_coal_request()).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_error_envelope(&body, "SERVICE_UNAVAILABLE");
}

#[tokio::test]
async fn test_oversized_body_is_413() {
    let mut config = BlendConfig::default();
    config.server.max_body_bytes = 64;
    let state = ApiState::from_config(config);

    let payload = two_coal_request().to_string();
    let req = Request::builder()
        .method("POST")
        .uri("/api/v1/optimize")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::CONTENT_LENGTH, payload.len())
        .body(Body::from(payload))
        .unwrap();
    let resp = create_app(state).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

// ============================================================================
// AFT & Normalize
// ============================================================================

#[tokio::test]
async fn test_aft_endpoint_uses_mid_regime_at_55() {
    let request = json!({ "properties": { "SiO2": 45, "Al₂O₃": "10" } });
    let (status, body) = post_json(create_test_state(), "/api/v1/aft", &request).await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(body["regime"], "mid_silica");

    let aft = body["predicted_aft"].as_f64().unwrap();
    assert!((aft - (1323.0 + 1.45 * 45.0 + 0.683 * 10.0)).abs() < 1e-9, "aft = {aft}");
    assert_eq!(body["oxides"]["SiO2"], json!(45.0));
    assert_eq!(body["oxides"]["CaO"], json!(0.0));
    assert_eq!(body["warnings"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_normalize_endpoint_folds_headers() {
    let request = json!({
        "properties": {
            "SiO₂ (%)": "52,5",
            "Silica": 10,
            "Heat Value": 5400,
            "Supplier": "Mine 7"
        }
    });
    let (status, body) = post_json(create_test_state(), "/api/v1/normalize", &request).await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(body["properties"]["SiO2"], json!(52.5));
    assert_eq!(body["properties"]["GCV"], json!(5400.0));
    assert_eq!(body["unrecognized"], json!(["Supplier"]));
    assert_eq!(body["warnings"].as_array().unwrap().len(), 1);
}
