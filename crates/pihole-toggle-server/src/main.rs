//! pihole-toggle - toggle Pi-hole blocking over HTTP without handing out the API key.
//!
//! Reads its configuration from the environment (or a `.env` file), logs in
//! to the Pi-hole on demand and exposes a small JSON API.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pihole_toggle_core::config::ENV_ACCEPT_INVALID_CERTS;
use pihole_toggle_core::{Config, PiholeClient, Relay, SessionManager, SystemClock};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let config = Config::from_env().context("Invalid configuration")?;
    let api_base_url = config.api_base_url();
    info!(api = %api_base_url, "Using Pi-hole API");

    if config.accept_invalid_certs {
        warn!(
            "TLS certificate verification for the Pi-hole is disabled; set {}=false to enable it",
            ENV_ACCEPT_INVALID_CERTS
        );
    }

    let client = Arc::new(
        PiholeClient::new(api_base_url, config.accept_invalid_certs)
            .context("Failed to create Pi-hole client")?,
    );
    let sessions = SessionManager::new(client.clone(), config.api_key.clone(), Arc::new(SystemClock));
    let relay = Arc::new(Relay::new(client, sessions));

    let addr = SocketAddr::new(config.bind, config.port);
    pihole_toggle_server::run_server(addr, relay).await?;

    info!("Pi-hole toggle server stopped");
    Ok(())
}
