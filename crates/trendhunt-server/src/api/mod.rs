mod trends;

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use trendhunt_core::TrackedTerm;
use trendhunt_db::PersistenceGateway;
use trendhunt_signals::{Collector, Summarizer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState};

#[derive(Clone)]
pub struct AppState {
    pub collector: Arc<Collector>,
    pub gateway: Arc<dyn PersistenceGateway>,
    pub terms: Arc<Vec<TrackedTerm>>,
    pub summarizer: Arc<Summarizer>,
    pub max_concurrent_terms: usize,
}

/// Body of every error response: `{"error": "<message>"}`.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    persistence: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            HeaderName::from_static("x-csrf-token"),
            HeaderName::from_static("x-requested-with"),
            header::ACCEPT,
            HeaderName::from_static("accept-version"),
            header::CONTENT_LENGTH,
            HeaderName::from_static("content-md5"),
            header::CONTENT_TYPE,
            header::DATE,
            HeaderName::from_static("x-api-version"),
        ])
}

fn trends_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route(
            "/trends",
            get(trends::list_trends).options(trends::trends_preflight),
        )
        .route("/trends/analysis", post(trends::analyze_trend))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(trends_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    if !state.gateway.is_enabled() {
        return (
            StatusCode::OK,
            Json(HealthData {
                status: "ok",
                persistence: "disabled",
            }),
        );
    }

    match state.gateway.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthData {
                status: "ok",
                persistence: "ok",
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: persistence unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthData {
                    status: "degraded",
                    persistence: "unavailable",
                }),
            )
        }
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
