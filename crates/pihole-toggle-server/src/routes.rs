//! Client-facing JSON API.
//!
//! Every response carries `success`; failures add an `error` message and a
//! non-2xx status. Only the health check answers without touching the Pi-hole.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use pihole_toggle_core::{coerce_timer, DisableOutcome, EnableOutcome, Relay, RelayError, StatusReport};

pub type SharedRelay = Arc<Relay>;

const HEALTH_MESSAGE: &str = "Pi-hole control server is running";

pub fn router(relay: SharedRelay) -> Router {
    Router::new()
        .route("/api/status", get(status))
        .route("/api/disable", post(disable))
        .route("/api/enable", post(enable))
        .route("/api/health", get(health))
        .with_state(relay)
}

/// `{"success": true, ...payload}`
#[derive(Debug, Serialize)]
struct Success<T> {
    success: bool,
    #[serde(flatten)]
    data: T,
}

impl<T: Serialize> Success<T> {
    fn json(data: T) -> Json<Self> {
        Json(Self { success: true, data })
    }
}

#[derive(Debug, Serialize)]
struct Failure {
    success: bool,
    error: String,
}

/// Error returned from a handler, rendered as `{"success": false, "error": ...}`
#[derive(Debug)]
struct HandlerError {
    status: StatusCode,
    message: String,
}

impl From<RelayError> for HandlerError {
    fn from(err: RelayError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let body = Failure {
            success: false,
            error: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
struct DisableRequest {
    #[serde(default)]
    timer: Value,
}

#[derive(Debug, Serialize)]
struct Health {
    message: &'static str,
    timestamp: String,
}

async fn status(State(relay): State<SharedRelay>) -> Result<Json<Success<StatusReport>>, HandlerError> {
    let report = relay.get_status().await?;
    debug!(blocking = ?report.blocking, timer = ?report.timer, "Status");
    Ok(Success::json(report))
}

/// True for `application/json` and `application/*+json`, ignoring parameters
fn is_json_content_type(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let mime = value.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

async fn disable(
    State(relay): State<SharedRelay>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Success<DisableOutcome>>, HandlerError> {
    // A body that is empty or not declared as JSON is the same as `{}`
    let request: DisableRequest = if !is_json_content_type(&headers) || body.iter().all(u8::is_ascii_whitespace) {
        DisableRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, "Rejected malformed disable request");
            HandlerError {
                status: StatusCode::BAD_REQUEST,
                message: format!("Invalid request body: {}", e),
            }
        })?
    };

    let timer = coerce_timer(&request.timer);
    Ok(Success::json(relay.disable_blocking(timer).await?))
}

async fn enable(State(relay): State<SharedRelay>) -> Result<Json<Success<EnableOutcome>>, HandlerError> {
    Ok(Success::json(relay.enable_blocking().await?))
}

async fn health() -> Json<Success<Health>> {
    Success::json(Health {
        message: HEALTH_MESSAGE,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
