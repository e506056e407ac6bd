//! Relay operations: status, disable and enable.
//!
//! Each operation acquires a session from the `SessionManager` and forwards a
//! single call to the Pi-hole. There is no retry; a failed call is reported
//! as-is and the cached session is left untouched.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

use crate::api::{ApiError, Upstream};
use crate::auth::{AuthError, SessionManager};
use crate::models::{BlockingState, SetBlockingRequest};

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("{context}: {source}")]
    Auth {
        context: &'static str,
        source: AuthError,
    },

    #[error("{context}: {source}")]
    Upstream {
        context: &'static str,
        source: ApiError,
    },
}

impl RelayError {
    fn auth(context: &'static str) -> impl FnOnce(AuthError) -> Self {
        move |source| RelayError::Auth { context, source }
    }

    fn upstream(context: &'static str) -> impl FnOnce(ApiError) -> Self {
        move |source| RelayError::Upstream { context, source }
    }
}

const STATUS_CONTEXT: &str = "Failed to get status";
const DISABLE_CONTEXT: &str = "Failed to disable blocking";
const ENABLE_CONTEXT: &str = "Failed to enable blocking";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub blocking: BlockingState,
    /// `true` only when blocking is enabled
    pub status: bool,
    pub timer: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisableOutcome {
    pub message: String,
    pub timer: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnableOutcome {
    pub message: String,
}

pub struct Relay {
    upstream: Arc<dyn Upstream>,
    sessions: SessionManager,
}

impl Relay {
    pub fn new(upstream: Arc<dyn Upstream>, sessions: SessionManager) -> Self {
        Self { upstream, sessions }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub async fn get_status(&self) -> Result<StatusReport, RelayError> {
        let result = async {
            let sid = self.sessions.acquire().await.map_err(RelayError::auth(STATUS_CONTEXT))?;
            self.upstream
                .blocking_status(sid.as_deref())
                .await
                .map_err(RelayError::upstream(STATUS_CONTEXT))
        }
        .await;

        let status = log_failure(result)?;
        Ok(StatusReport {
            blocking: status.blocking,
            status: status.blocking.is_blocking(),
            timer: status.timer_seconds(),
        })
    }

    /// Disable blocking, for `timer` seconds if given, otherwise indefinitely
    pub async fn disable_blocking(&self, timer: Option<u64>) -> Result<DisableOutcome, RelayError> {
        let timer = timer.filter(|t| *t > 0);
        let request = SetBlockingRequest {
            blocking: false,
            timer,
        };
        log_failure(self.set_blocking(&request, DISABLE_CONTEXT).await)?;

        info!(timer = ?timer, "Blocking disabled");
        let message = match timer {
            Some(secs) => format!("Blocking disabled for {} seconds", secs),
            None => "Blocking disabled".to_string(),
        };
        Ok(DisableOutcome { message, timer })
    }

    pub async fn enable_blocking(&self) -> Result<EnableOutcome, RelayError> {
        let request = SetBlockingRequest {
            blocking: true,
            timer: None,
        };
        log_failure(self.set_blocking(&request, ENABLE_CONTEXT).await)?;

        info!("Blocking enabled");
        Ok(EnableOutcome {
            message: "Blocking enabled".to_string(),
        })
    }

    async fn set_blocking(&self, request: &SetBlockingRequest, context: &'static str) -> Result<(), RelayError> {
        let sid = self.sessions.acquire().await.map_err(RelayError::auth(context))?;
        self.upstream
            .set_blocking(sid.as_deref(), request)
            .await
            .map_err(RelayError::upstream(context))
    }
}

fn log_failure<T>(result: Result<T, RelayError>) -> Result<T, RelayError> {
    if let Err(ref e) = result {
        error!(error = %e, "Relay operation failed");
    }
    result
}

/// Interpret a client-supplied timer the lenient way browsers send it.
///
/// Numbers are truncated, strings are read up to the first non-digit
/// (`"30s"` is 30). Anything else, including zero and negatives, means no timer.
pub fn coerce_timer(value: &Value) -> Option<u64> {
    let secs = match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()).map(f64::trunc)?,
        Value::String(s) => leading_integer(s)?,
        _ => return None,
    };
    if secs >= 1.0 {
        Some(secs.min(u64::MAX as f64) as u64)
    } else {
        None
    }
}

fn leading_integer(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    let value: f64 = rest[..digits_end].parse().ok()?;
    Some(if negative { -value } else { value })
}
