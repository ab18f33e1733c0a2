//! HTTP Controller (Driver Adapter)
//!
//! Axum-based REST API that delegates to the strategy service.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::Instrument as _;
use uuid::Uuid;

use crate::application::dto::StrategyRequestDto;
use crate::application::ports::OptionChainPort;
use crate::application::services::StrategyService;
use crate::error::EngineError;

use super::response::{ApiError, HealthResponse, RootResponse};

/// Response header carrying the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Application state shared across handlers.
pub struct AppState<C>
where
    C: OptionChainPort,
{
    /// Strategy analysis service.
    pub service: Arc<StrategyService>,
    /// Option chain catalog.
    pub catalog: Arc<C>,
    /// Application version.
    pub version: String,
}

impl<C> Clone for AppState<C>
where
    C: OptionChainPort,
{
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            catalog: Arc::clone(&self.catalog),
            version: self.version.clone(),
        }
    }
}

/// Create the HTTP router with all endpoints.
///
/// Requests larger than `body_limit` bytes are rejected with 413.
pub fn create_router<C>(state: AppState<C>, body_limit: usize) -> Router
where
    C: OptionChainPort + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/options", get(list_options::<C>))
        .route("/strategy/simulate", post(simulate_strategy::<C>))
        .route("/strategy/adjust", post(adjust_strategy::<C>))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Banner endpoint.
async fn root() -> impl IntoResponse {
    Json(RootResponse {
        message: "Options Strategy Engine is running".to_string(),
    })
}

/// Health check endpoint.
async fn health_check<C>(State(state): State<AppState<C>>) -> impl IntoResponse
where
    C: OptionChainPort,
{
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
    })
}

/// Option chain catalog endpoint.
async fn list_options<C>(State(state): State<AppState<C>>) -> Response
where
    C: OptionChainPort,
{
    let request_id = Uuid::new_v4();
    let result = state
        .catalog
        .list_instruments()
        .instrument(tracing::info_span!("http.options", %request_id))
        .await
        .map_err(|e| ApiError::from(EngineError::catalog_unavailable(e.to_string())));
    respond(request_id, result)
}

/// Simulate endpoint.
async fn simulate_strategy<C>(
    State(state): State<AppState<C>>,
    payload: Result<Json<StrategyRequestDto>, JsonRejection>,
) -> Response
where
    C: OptionChainPort,
{
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("http.simulate", %request_id);
    let result = match payload {
        Ok(Json(request)) => state
            .service
            .simulate_blocking(request)
            .instrument(span)
            .await
            .map_err(ApiError::from),
        Err(rejection) => Err(ApiError::from(rejection)),
    };
    respond(request_id, result)
}

/// Adjust endpoint.
async fn adjust_strategy<C>(
    State(state): State<AppState<C>>,
    payload: Result<Json<StrategyRequestDto>, JsonRejection>,
) -> Response
where
    C: OptionChainPort,
{
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("http.adjust", %request_id);
    let result = match payload {
        Ok(Json(request)) => state
            .service
            .adjust_blocking(request)
            .instrument(span)
            .await
            .map_err(ApiError::from),
        Err(rejection) => Err(ApiError::from(rejection)),
    };
    respond(request_id, result)
}

fn respond<T: Serialize>(request_id: Uuid, result: Result<T, ApiError>) -> Response {
    let header = [(REQUEST_ID_HEADER, request_id.to_string())];
    match result {
        Ok(body) => (header, Json(body)).into_response(),
        Err(error) => {
            if error.status().is_server_error() {
                tracing::error!(%request_id, status = %error.status(), code = %error.body().code, "Request failed");
            } else {
                tracing::debug!(%request_id, status = %error.status(), code = %error.body().code, "Request rejected");
            }
            (header, error).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::application::ports::{
        InMemoryOptionChain, MockOptionChainPort, OptionChainError, OptionContract,
    };
    use crate::domain::strategy::OptionType;

    fn state_with<C: OptionChainPort>(catalog: C) -> AppState<C> {
        AppState {
            service: Arc::new(StrategyService::default()),
            catalog: Arc::new(catalog),
            version: "0.1.0".to_string(),
        }
    }

    fn router() -> Router {
        let chain = InMemoryOptionChain::new(vec![OptionContract {
            symbol: "NIFTY26NOV25000CE".to_string(),
            underlying: "NIFTY".to_string(),
            option_type: OptionType::Call,
            strike: dec!(25000),
            premium: dec!(182.35),
            expiry: NaiveDate::from_ymd_opt(2026, 11, 26).unwrap(),
        }]);
        create_router(state_with(chain), 1024 * 1024)
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_root_banner() {
        let (status, json) = send(router(), get_request("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["message"].as_str().unwrap().contains("running"));
    }

    #[tokio::test]
    async fn test_health_check() {
        let (status, json) = send(router(), get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["version"], "0.1.0");
    }

    #[tokio::test]
    async fn test_options_lists_catalog() {
        let (status, json) = send(router(), get_request("/options")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json[0]["symbol"], "NIFTY26NOV25000CE");
        assert_eq!(json[0]["premium"], "182.35");
    }

    #[tokio::test]
    async fn test_options_unavailable_is_503() {
        let mut catalog = MockOptionChainPort::new();
        catalog.expect_list_instruments().returning(|| {
            Err(OptionChainError::Unavailable {
                message: "file missing".to_string(),
            })
        });

        let (status, json) = send(create_router(state_with(catalog), 1024), get_request("/options")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["code"], "CATALOG_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_simulate_long_call() {
        let body = json!({
            "legs": [{"type": "call", "position": "long", "strike": 25000, "premium": 100, "quantity": 1}],
            "spot_price": 25000
        });

        let response = router()
            .oneshot(post_json("/strategy/simulate", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["total_premium"], -100.0);
        assert_eq!(json["max_profit"], "UNBOUNDED");
        assert_eq!(json["max_loss"], -100.0);
        assert_eq!(json["breakevens"], json!([25100.0]));
        assert_eq!(json["payoff"].as_array().unwrap().len(), 101);
    }

    #[tokio::test]
    async fn test_simulate_malformed_json_is_400() {
        let request = Request::builder()
            .method("POST")
            .uri("/strategy/simulate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"legs\": ["))
            .unwrap();

        let (status, json) = send(router(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_simulate_zero_quantity_is_422() {
        let body = json!({
            "legs": [{"type": "put", "side": "sell", "strike": 24000, "premium": 80, "quantity": 0}],
            "spot_price": 25000
        });

        let (status, json) = send(router(), post_json("/strategy/simulate", &body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["code"], "INVALID_LEG");
        assert_eq!(json["details"]["leg_index"], "0");
    }

    #[tokio::test]
    async fn test_simulate_empty_legs_is_422() {
        let body = json!({"legs": [], "spot_price": 25000});
        let (status, json) = send(router(), post_json("/strategy/simulate", &body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_adjust_naked_put() {
        let body = json!({
            "legs": [{"option_type": "put", "side": "sell", "strike_price": 24000, "premium": 80, "quantity": 1}],
            "spot_price": 25000
        });

        let (status, json) = send(router(), post_json("/strategy/adjust", &body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["patterns"][0]["pattern"], "naked_exposure");
        assert!(
            json["suggestions"][0]
                .as_str()
                .unwrap()
                .contains("put below 24000")
        );
    }

    #[tokio::test]
    async fn test_body_limit() {
        let router = create_router(state_with(InMemoryOptionChain::default()), 16);
        let body = json!({
            "legs": [{"type": "call", "position": "long", "strike": 25000, "premium": 100, "quantity": 1}],
            "spot_price": 25000
        });

        let (status, _) = send(router, post_json("/strategy/simulate", &body)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let request = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .unwrap();

        let response = router().oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
