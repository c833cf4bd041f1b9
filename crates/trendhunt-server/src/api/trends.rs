use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use trendhunt_core::TrendRecord;
use trendhunt_signals::run_collection;

use super::{AppState, ErrorResponse};
use crate::middleware::RequestId;

/// Collect and score every tracked term on demand.
pub(super) async fn list_trends(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Response {
    let result = run_collection(
        Arc::clone(&state.collector),
        Arc::clone(&state.gateway),
        &state.terms,
        state.max_concurrent_terms,
    )
    .await;

    match result {
        Ok(records) => Json(records).into_response(),
        Err(e) => {
            tracing::error!(request_id = %req_id.0, error = %e, "trend collection failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new("Failed to fetch trends")),
            )
                .into_response()
        }
    }
}

pub(super) async fn trends_preflight() -> StatusCode {
    StatusCode::OK
}

/// Narrative analysis for one scored record. Falls back to a fixed result
/// when the summarizer is unavailable.
pub(super) async fn analyze_trend(
    State(state): State<AppState>,
    Json(record): Json<TrendRecord>,
) -> impl IntoResponse {
    Json(state.summarizer.analyze(&record).await)
}
