//! Authentication module for managing the Pi-hole session.
//!
//! This module provides:
//! - `SessionData`: a session id with its expiry
//! - `SessionManager`: the single cached session, refreshed on demand
//!
//! Sessions live in memory only and are reused for 5 minutes.

pub mod session;

use thiserror::Error;

use crate::api::ApiError;

pub use session::{SessionData, SessionManager, SESSION_TTL_MINUTES};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication failed: {0}")]
    Upstream(#[from] ApiError),

    #[error("Authentication failed: {0}")]
    MissingSession(String),
}
