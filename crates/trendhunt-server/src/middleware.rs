use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::api::ErrorResponse;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

#[derive(Debug, Clone)]
struct RateLimitWindow {
    started_at: Instant,
    count: usize,
}

/// Fixed-window limiter shared by every route it is layered on.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    state: Arc<Mutex<RateLimitWindow>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            state: Arc::new(Mutex::new(RateLimitWindow {
                started_at: Instant::now(),
                count: 0,
            })),
        }
    }

    /// `per_minute` requests per one-minute window.
    #[must_use]
    pub fn per_minute(per_minute: usize) -> Self {
        Self::new(per_minute, Duration::from_secs(60))
    }

    /// Count one request against the current window; `false` once the window
    /// is full.
    async fn try_acquire(&self) -> bool {
        let mut window = self.state.lock().await;
        if window.started_at.elapsed() >= self.window {
            window.started_at = Instant::now();
            window.count = 0;
        }
        if window.count >= self.max_requests {
            return false;
        }
        window.count += 1;
        true
    }
}

/// Axum middleware that extracts or generates a request ID.
///
/// An incoming `x-request-id` header is reused; otherwise a new `UUIDv4` is
/// generated. The ID is stored in request extensions as [`RequestId`] and
/// echoed on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, val);
    }

    res
}

/// Middleware enforcing a fixed request-per-window limit.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    if !rate_limit.try_acquire().await {
        tracing::debug!(path = %req.uri().path(), "rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ErrorResponse::new("Too many requests")),
        )
            .into_response();
    }

    next.run(req).await
}
