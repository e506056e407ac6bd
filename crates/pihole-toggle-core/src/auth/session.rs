use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::api::Upstream;
use crate::clock::Clock;

use super::AuthError;

/// How long a session id is reused before logging in again.
/// Pi-hole sessions default to 30 minutes of validity; 5 keeps us well inside it.
pub const SESSION_TTL_MINUTES: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    /// `None` for a Pi-hole without a password, which issues no session id
    pub sid: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl SessionData {
    pub fn new(sid: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            sid,
            expires_at: now + Duration::minutes(SESSION_TTL_MINUTES),
        }
    }

    /// A session is valid only while `now < expires_at`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn time_until_expiry(&self, now: DateTime<Utc>) -> Duration {
        self.expires_at - now
    }
}

/// Owns the one cached Pi-hole session and refreshes it on demand.
///
/// The cache lock is held across the login request, so concurrent callers
/// that find the cache empty wait for a single login instead of racing.
pub struct SessionManager {
    upstream: Arc<dyn Upstream>,
    password: String,
    clock: Arc<dyn Clock>,
    cached: Mutex<Option<SessionData>>,
}

impl SessionManager {
    pub fn new(upstream: Arc<dyn Upstream>, password: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            upstream,
            password: password.into(),
            clock,
            cached: Mutex::new(None),
        }
    }

    /// Return a valid session id, logging in if none is cached or it has expired
    pub async fn acquire(&self) -> Result<Option<String>, AuthError> {
        let mut cached = self.cached.lock().await;
        let now = self.clock.now();

        if let Some(ref data) = *cached {
            if !data.is_expired(now) {
                debug!(
                    expires_in_secs = data.time_until_expiry(now).num_seconds(),
                    "Reusing cached Pi-hole session"
                );
                return Ok(data.sid.clone());
            }
            debug!("Cached Pi-hole session expired");
            *cached = None;
        }

        let sid = match self.upstream.authenticate(&self.password).await {
            Ok(sid) => sid,
            Err(e) => {
                debug!(error = %e, "Pi-hole authentication failed");
                return Err(e);
            }
        };

        info!(has_sid = sid.is_some(), "Authenticated with Pi-hole");
        let data = SessionData::new(sid, self.clock.now());
        let sid = data.sid.clone();
        *cached = Some(data);
        Ok(sid)
    }

    /// Snapshot of the cached session, if any
    pub async fn current(&self) -> Option<SessionData> {
        self.cached.lock().await.clone()
    }
}
