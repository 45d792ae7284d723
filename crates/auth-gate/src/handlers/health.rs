//! Liveness handlers.
//!
//! - `/`: Service banner with version
//! - `/health`: Liveness probe, also the target of `--health-check`
//!
//! Neither checks the signing secret; a bad secret stops the process at
//! startup instead.

use crate::middleware::RequestId;
use crate::models::{HealthResponse, IndexResponse};
use axum::{Extension, Json};

/// Service name reported by the liveness endpoints.
pub const SERVICE_NAME: &str = "auth-service";

/// Banner handler for `/`.
pub async fn index(Extension(request_id): Extension<RequestId>) -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "auth-service is running",
        version: env!("CARGO_PKG_VERSION"),
        status: "healthy",
        request_id: request_id.into_string(),
    })
}

/// Liveness probe handler for `/health`.
pub async fn health_check(Extension(request_id): Extension<RequestId>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        request_id: request_id.into_string(),
    })
}
