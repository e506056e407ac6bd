//! Data types exchanged with the Pi-hole API.

use serde::{Deserialize, Serialize};

/// DNS blocking state as reported by the Pi-hole.
///
/// `Failed` and `Unknown` show up while FTL is starting or after a failed
/// toggle; both count as "not blocking".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockingState {
    Enabled,
    Disabled,
    Failed,
    Unknown,
}

impl BlockingState {
    pub fn is_blocking(self) -> bool {
        matches!(self, BlockingState::Enabled)
    }
}

/// Response body of `GET /dns/blocking`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BlockingStatus {
    pub blocking: BlockingState,
    /// Seconds remaining on a temporary disable; may be fractional
    #[serde(default)]
    pub timer: Option<f64>,
}

impl BlockingStatus {
    /// Remaining timer in whole seconds, rounded up. Zero or absent means no timer.
    pub fn timer_seconds(&self) -> Option<u64> {
        self.timer
            .filter(|t| t.is_finite() && *t > 0.0)
            .map(|t| t.ceil() as u64)
    }
}

/// Request body of `POST /dns/blocking`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetBlockingRequest {
    pub blocking: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer: Option<u64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AuthRequest<'a> {
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthResponse {
    pub session: AuthSession,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthSession {
    #[serde(default)]
    pub valid: bool,
    #[serde(default)]
    pub sid: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
