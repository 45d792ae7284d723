//! Auth Gate configuration.
//!
//! Configuration is loaded from environment variables once at startup. The
//! signing secret and the expected issuer are NOT part of this struct: both
//! are re-read from the environment on every verification.

use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;
use thiserror::Error;

/// Default listener address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:9090";

/// Default name of the signing secret variable.
pub const DEFAULT_SECRET_ENV: &str = "WEBUI_SECRET_KEY";

/// Default name of the expected-issuer variable.
pub const DEFAULT_ISSUER_ENV: &str = "WEBUI_JWT_ISSUER";

/// Default graceful-shutdown drain period in seconds.
pub const DEFAULT_DRAIN_SECONDS: u64 = 0;

/// Auth Gate configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:9090").
    pub bind_address: SocketAddr,

    /// Name of the variable holding the signing secret. `<name>_FILE` is
    /// consulted when it is unset.
    pub secret_env: String,

    /// Name of the variable holding the expected issuer.
    pub issuer_env: String,

    /// Validate the secret and exit without serving.
    pub skip_server_start: bool,

    /// Seconds to wait after a shutdown signal before exiting.
    pub drain_seconds: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid bind address: {0}")]
    InvalidBindAddress(String),

    #[error("Invalid variable name configuration: {0}")]
    InvalidVariableName(String),

    #[error("Invalid drain period configuration: {0}")]
    InvalidDrainSeconds(String),
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address_str = vars
            .get("BIND_ADDRESS")
            .map(String::as_str)
            .unwrap_or(DEFAULT_BIND_ADDRESS);

        let bind_address: SocketAddr = bind_address_str.parse().map_err(|e| {
            ConfigError::InvalidBindAddress(format!(
                "BIND_ADDRESS must be host:port, got '{}': {}",
                bind_address_str, e
            ))
        })?;

        let secret_env = variable_name(vars, "AUTH_SECRET_ENV", DEFAULT_SECRET_ENV)?;
        let issuer_env = variable_name(vars, "AUTH_ISSUER_ENV", DEFAULT_ISSUER_ENV)?;

        let skip_server_start = vars
            .get("SKIP_SERVER_START")
            .is_some_and(|v| v == "1");

        let drain_seconds = if let Some(value_str) = vars.get("AUTH_DRAIN_SECONDS") {
            value_str.parse::<u64>().map_err(|e| {
                ConfigError::InvalidDrainSeconds(format!(
                    "AUTH_DRAIN_SECONDS must be a non-negative integer, got '{}': {}",
                    value_str, e
                ))
            })?
        } else {
            DEFAULT_DRAIN_SECONDS
        };

        Ok(Config {
            bind_address,
            secret_env,
            issuer_env,
            skip_server_start,
            drain_seconds,
        })
    }
}

/// Read an environment variable *name* from `key`, falling back to `default`.
fn variable_name(
    vars: &HashMap<String, String>,
    key: &str,
    default: &str,
) -> Result<String, ConfigError> {
    let Some(value) = vars.get(key) else {
        return Ok(default.to_string());
    };

    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !valid {
        return Err(ConfigError::InvalidVariableName(format!(
            "{} must be a non-empty name of [A-Za-z0-9_], got '{}'",
            key, value
        )));
    }

    Ok(value.clone())
}
