//! Relay configuration.
//!
//! Everything comes from the environment (a `.env` file is loaded by the
//! binary before this runs). The Pi-hole host and API key are required;
//! missing either is fatal at startup.

use std::net::{IpAddr, Ipv4Addr};

use thiserror::Error;

/// Default API path appended to the Pi-hole host
const DEFAULT_API_BASE: &str = "/api";

/// Default listen address for the relay
const DEFAULT_BIND: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Default listen port for the relay
const DEFAULT_PORT: u16 = 8082;

pub const ENV_HOST: &str = "PIHOLE_HOST";
pub const ENV_API_BASE: &str = "PIHOLE_API_BASE";
pub const ENV_API_KEY: &str = "PIHOLE_API_KEY";
pub const ENV_ACCEPT_INVALID_CERTS: &str = "PIHOLE_ACCEPT_INVALID_CERTS";
pub const ENV_BIND: &str = "PIHOLE_TOGGLE_BIND";
pub const ENV_PORT: &str = "PIHOLE_TOGGLE_PORT";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    pub pihole_host: String,
    pub api_base: String,
    pub api_key: String,
    /// Skip TLS certificate verification when talking to the Pi-hole
    pub accept_invalid_certs: bool,
    pub bind: IpAddr,
    pub port: u16,
}

// The API key stays out of logs
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("pihole_host", &self.pihole_host)
            .field("api_base", &self.api_base)
            .field("api_key", &"<redacted>")
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .field("bind", &self.bind)
            .field("port", &self.port)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let pihole_host = get(ENV_HOST).ok_or(ConfigError::Missing(ENV_HOST))?;
        if !has_http_scheme(&pihole_host) {
            return Err(ConfigError::Invalid {
                name: ENV_HOST,
                value: pihole_host,
                reason: "expected an http:// or https:// URL",
            });
        }
        let api_key = get(ENV_API_KEY).ok_or(ConfigError::Missing(ENV_API_KEY))?;
        let api_base = get(ENV_API_BASE).unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let accept_invalid_certs = match get(ENV_ACCEPT_INVALID_CERTS) {
            Some(value) => parse_bool(&value).ok_or(ConfigError::Invalid {
                name: ENV_ACCEPT_INVALID_CERTS,
                value,
                reason: "expected true or false",
            })?,
            None => true,
        };

        let bind = match get(ENV_BIND) {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: ENV_BIND,
                value,
                reason: "expected an IP address",
            })?,
            None => DEFAULT_BIND,
        };

        let port = match get(ENV_PORT) {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: ENV_PORT,
                value,
                reason: "expected a port number",
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            pihole_host,
            api_base,
            api_key,
            accept_invalid_certs,
            bind,
            port,
        })
    }

    /// Full URL of the Pi-hole API, e.g. `https://pi.hole/api`
    pub fn api_base_url(&self) -> String {
        let host = self.pihole_host.trim_end_matches('/');
        let base = self.api_base.trim_end_matches('/');
        if base.is_empty() || base.starts_with('/') {
            format!("{}{}", host, base)
        } else {
            format!("{}/{}", host, base)
        }
    }
}

fn has_http_scheme(host: &str) -> bool {
    let lower = host.to_ascii_lowercase();
    ["http://", "https://"]
        .iter()
        .any(|scheme| lower.starts_with(scheme) && lower.len() > scheme.len())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
