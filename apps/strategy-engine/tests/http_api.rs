//! HTTP API tests against the full router with a file-backed catalog.

#![allow(clippy::unwrap_used)]

use std::io::Write;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use strategy_engine::StrategyService;
use strategy_engine::config::load_config_from_string;
use strategy_engine::infrastructure::http::{AppState, create_router};
use strategy_engine::infrastructure::option_chain::JsonFileOptionChain;
use tower::ServiceExt;

const CHAIN: &str = r#"[
    {"symbol": "NIFTY26NOV24500PE", "underlying": "NIFTY", "option_type": "PUT",
     "strike": "24500", "premium": "96.10", "expiry": "2026-11-26"},
    {"symbol": "NIFTY26NOV25500CE", "underlying": "NIFTY", "option_type": "CALL",
     "strike": "25500", "premium": "88.75", "expiry": "2026-11-26"}
]"#;

async fn app(catalog_path: &std::path::Path) -> Router {
    let config = load_config_from_string("grid:\n  step_fraction: 0.01\n").unwrap();
    let state = AppState {
        service: Arc::new(StrategyService::from_config(&config)),
        catalog: Arc::new(JsonFileOptionChain::load(catalog_path).await),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    create_router(state, config.server.body_limit_bytes)
}

async fn call(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn post(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn iron_condor() -> Value {
    json!({
        "legs": [
            {"type": "put", "position": "long", "strike": 23500, "premium": 30, "quantity": 1},
            {"type": "put", "position": "short", "strike": 24000, "premium": 80, "quantity": 1},
            {"type": "call", "position": "short", "strike": 26000, "premium": 80, "quantity": 1},
            {"type": "call", "position": "long", "strike": 26500, "premium": 30, "quantity": 1}
        ],
        "spot_price": 25000
    })
}

#[tokio::test]
async fn options_served_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(CHAIN.as_bytes()).unwrap();

    let request = Request::builder().uri("/options").body(Body::empty()).unwrap();
    let (status, json) = call(app(file.path()).await, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[1]["option_type"], "CALL");
}

#[tokio::test]
async fn missing_catalog_only_affects_options() {
    let dir = tempfile::tempdir().unwrap();
    let router = app(&dir.path().join("absent.json")).await;

    let request = Request::builder().uri("/options").body(Body::empty()).unwrap();
    let (status, _) = call(router.clone(), request).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (status, _) = call(router, post("/strategy/simulate", &iron_condor())).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn iron_condor_simulation() {
    let dir = tempfile::tempdir().unwrap();
    let (status, json) = call(
        app(&dir.path().join("absent.json")).await,
        post("/strategy/simulate", &iron_condor()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_premium"], 100.0);
    assert_eq!(json["max_profit"], 100.0);
    assert_eq!(json["max_loss"], -400.0);
    assert_eq!(json["breakevens"], json!([23900.0, 26100.0]));
    assert_eq!(json["legs"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn iron_condor_is_balanced() {
    let dir = tempfile::tempdir().unwrap();
    let (status, json) = call(
        app(&dir.path().join("absent.json")).await,
        post("/strategy/adjust", &iron_condor()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["patterns"][0]["pattern"], "balanced");
    assert_eq!(
        json["suggestions"],
        json!(["Position is balanced; no adjustment needed"])
    );
}

#[tokio::test]
async fn negative_spot_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut body = iron_condor();
    body["spot_price"] = json!(-1.0);

    let (status, json) = call(
        app(&dir.path().join("absent.json")).await,
        post("/strategy/adjust", &body),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "INVALID_REQUEST");
    assert_eq!(json["details"]["field"], "spot_price");
}
