//! pihole-toggle core library
//!
//! Pi-hole API client, session cache and relay operations shared by the
//! HTTP server binary.

pub mod api;
pub mod auth;
pub mod clock;
pub mod config;
pub mod models;
pub mod relay;

#[cfg(test)]
mod test_support;

pub use api::{ApiError, PiholeClient, Upstream};
pub use auth::{AuthError, SessionData, SessionManager};
pub use clock::{Clock, SystemClock};
pub use config::{Config, ConfigError};
pub use models::{BlockingState, BlockingStatus, SetBlockingRequest};
pub use relay::{coerce_timer, DisableOutcome, EnableOutcome, Relay, RelayError, StatusReport};
