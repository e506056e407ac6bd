//! REST API client module for the Pi-hole.
//!
//! This module provides `PiholeClient` for talking to the Pi-hole v6 API and
//! the `Upstream` trait the relay is written against.
//!
//! The API uses session ids obtained from `POST /auth`, sent back on every
//! request in the `X-FTL-SID` header.

pub mod client;
pub mod error;

pub use client::{PiholeClient, Upstream, SID_HEADER};
pub use error::ApiError;
