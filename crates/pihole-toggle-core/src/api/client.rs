//! HTTP client for the Pi-hole v6 REST API.
//!
//! Only the three endpoints the relay needs are wrapped: session login and
//! reading/writing the DNS blocking state. Every call after login carries the
//! session id in the `X-FTL-SID` header, unless the Pi-hole has no password
//! set and hands out no session id at all.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::AuthError;
use crate::models::{AuthRequest, AuthResponse, BlockingStatus, SetBlockingRequest};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Header carrying the Pi-hole session id (`X-FTL-SID`).
/// Lowercase, as `HeaderName::from_static` requires.
pub const SID_HEADER: &str = "x-ftl-sid";

/// HTTP request timeout in seconds.
/// A Pi-hole on a LAN answers in milliseconds; anything slower is a dead host.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Operations the relay performs against the upstream Pi-hole.
///
/// `PiholeClient` is the real implementation; tests substitute a counting mock.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Log in with the app password and return the session id.
    /// `None` means the Pi-hole accepted the login without issuing one.
    async fn authenticate(&self, password: &str) -> Result<Option<String>, AuthError>;

    /// Read the current blocking state
    async fn blocking_status(&self, sid: Option<&str>) -> Result<BlockingStatus, ApiError>;

    /// Enable or disable blocking, optionally for `timer` seconds
    async fn set_blocking(&self, sid: Option<&str>, request: &SetBlockingRequest) -> Result<(), ApiError>;
}

/// API client for a single Pi-hole instance.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct PiholeClient {
    client: Client,
    base_url: String,
}

impl PiholeClient {
    /// Create a client for `base_url` (host plus API path, e.g. `https://pi.hole/api`).
    ///
    /// With `accept_invalid_certs` the TLS certificate is not verified, which is
    /// what self-signed Pi-hole installs need.
    pub fn new(base_url: impl Into<String>, accept_invalid_certs: bool) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn sid_headers(sid: Option<&str>) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        if let Some(sid) = sid {
            let value = header::HeaderValue::from_str(sid)
                .map_err(|_| ApiError::InvalidResponse("Session id is not a valid header value".into()))?;
            headers.insert(SID_HEADER, value);
        }
        Ok(headers)
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), body = %body, "Pi-hole returned an error");
            Err(ApiError::from_status(status, &body))
        }
    }

    async fn parse_json<T: DeserializeOwned>(response: reqwest::Response, what: &str) -> Result<T, ApiError> {
        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse {}: {}", what, e)))
    }
}

#[async_trait]
impl Upstream for PiholeClient {
    async fn authenticate(&self, password: &str) -> Result<Option<String>, AuthError> {
        let url = self.url("/auth");
        debug!(url = %url, "Authenticating with Pi-hole");

        let response = self
            .client
            .post(&url)
            .json(&AuthRequest { password })
            .send()
            .await
            .map_err(ApiError::from)?;

        let response = Self::check_response(response).await?;
        let auth: AuthResponse = Self::parse_json(response, "auth response").await?;

        match auth.session.sid {
            Some(sid) => Ok(Some(sid)),
            // No password set: the session is valid but there is no sid to send
            None if auth.session.valid => {
                debug!(message = ?auth.session.message, "Pi-hole issued no session id");
                Ok(None)
            }
            None => Err(AuthError::MissingSession(
                auth.session
                    .message
                    .unwrap_or_else(|| "no session id in response".to_string()),
            )),
        }
    }

    async fn blocking_status(&self, sid: Option<&str>) -> Result<BlockingStatus, ApiError> {
        let url = self.url("/dns/blocking");

        let response = self
            .client
            .get(&url)
            .headers(Self::sid_headers(sid)?)
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        Self::parse_json(response, "blocking status").await
    }

    async fn set_blocking(&self, sid: Option<&str>, request: &SetBlockingRequest) -> Result<(), ApiError> {
        let url = self.url("/dns/blocking");
        debug!(blocking = request.blocking, timer = ?request.timer, "Setting Pi-hole blocking");

        let response = self
            .client
            .post(&url)
            .headers(Self::sid_headers(sid)?)
            .json(request)
            .send()
            .await?;

        Self::check_response(response).await?;
        Ok(())
    }
}
