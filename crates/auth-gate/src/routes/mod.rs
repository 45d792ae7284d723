//! HTTP routes for Auth Gate.
//!
//! Defines the Axum router and application state.

use crate::auth::TokenVerifier;
use crate::config::Config;
use crate::handlers;
use crate::middleware::{http_trace_layer, json_error_body, request_id};
use axum::{middleware, routing::get, Router};
use common::secret::{EnvSource, SecretResolver};
use std::sync::Arc;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;

/// Upper bound on handling a single request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state shared across all handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Config,

    /// Token verifier used by `/validate`.
    pub verifier: TokenVerifier,
}

impl AppState {
    /// Build state whose verifier reads secrets from `env`.
    pub fn new(config: Config, env: Arc<dyn EnvSource>) -> Self {
        let verifier = TokenVerifier::new(
            SecretResolver::new(env),
            config.secret_env.clone(),
            config.issuer_env.clone(),
        );
        Self { config, verifier }
    }
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/` - Service banner
/// - `/health` - Liveness probe
/// - `/validate` - Forward-auth check of the `token` cookie
/// - TraceLayer for request logging
/// - 10 second request timeout
/// - JSON bodies for 404/405/408 responses
/// - Correlation id middleware (outermost, so every response carries it)
pub fn build_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health_check))
        .route("/validate", get(handlers::validate))
        .with_state(state)
        .layer(http_trace_layer())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(middleware::from_fn(json_error_body))
        .layer(middleware::from_fn(request_id))
}
