//! One-shot liveness probe used as the container health check.
//!
//! `auth-gate --health-check` GETs the health endpoint of a running
//! instance and exits 0 only on HTTP 200.

use common::secret::EnvSource;
use std::time::Duration;
use thiserror::Error;

/// First CLI argument that selects the probe instead of the server.
pub const HEALTH_CHECK_FLAG: &str = "--health-check";

/// Target used when neither override variable is set.
pub const DEFAULT_HEALTH_URL: &str = "http://localhost:9090/health";

/// Whole-request timeout for the probe.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Error)]
pub enum HealthCheckError {
    #[error("Failed to create HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("Health check request failed: {0}")]
    Request(reqwest::Error),

    #[error("Health check returned status {0}")]
    UnexpectedStatus(u16),
}

/// Resolve the probe target: `HEALTHCHECK_URL`, then `AUTH_HEALTH_URL`,
/// then [`DEFAULT_HEALTH_URL`]. Empty values are skipped.
pub fn resolve_target(env: &dyn EnvSource) -> String {
    ["HEALTHCHECK_URL", "AUTH_HEALTH_URL"]
        .into_iter()
        .filter_map(|name| env.var(name))
        .find(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_HEALTH_URL.to_string())
}

/// Probe `url` once.
///
/// # Errors
///
/// Fails on connection errors, on timeout, and on any status other than 200.
pub async fn run(url: &str) -> Result<(), HealthCheckError> {
    let client = reqwest::Client::builder()
        .timeout(HEALTH_CHECK_TIMEOUT)
        .build()
        .map_err(HealthCheckError::Client)?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(HealthCheckError::Request)?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(HealthCheckError::UnexpectedStatus(status.as_u16()));
    }

    Ok(())
}
