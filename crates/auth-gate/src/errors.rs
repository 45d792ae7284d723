//! Auth Gate error types.
//!
//! Errors map to HTTP responses via the `IntoResponse` impl. The client only
//! ever sees the short [`FailureKind`] reason; the detailed cause stays in
//! the server-side logs.

use crate::middleware::RequestId;
use crate::models::UnauthorizedResponse;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common::jwt::FailureKind;
use thiserror::Error;

/// `WWW-Authenticate` challenge attached to every 401.
pub const WWW_AUTHENTICATE_CHALLENGE: &str = "Bearer realm=\"auth-gate\", error=\"invalid_token\"";

/// Auth Gate error type.
#[derive(Debug, Error)]
pub enum AuthGateError {
    /// The request did not carry a token that verifies. Maps to 401.
    #[error("Unauthorized: {failure}")]
    Unauthorized {
        failure: FailureKind,
        request_id: RequestId,
    },
}

impl AuthGateError {
    /// Build an `Unauthorized` error for `request_id`.
    pub fn unauthorized(failure: FailureKind, request_id: RequestId) -> Self {
        AuthGateError::Unauthorized {
            failure,
            request_id,
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthGateError::Unauthorized { .. } => 401,
        }
    }
}

impl IntoResponse for AuthGateError {
    fn into_response(self) -> Response {
        match self {
            AuthGateError::Unauthorized {
                failure,
                request_id,
            } => {
                tracing::info!(
                    target: "auth_gate.http",
                    request_id = %request_id,
                    reason = failure.reason(),
                    "Request unauthorized"
                );

                let body = UnauthorizedResponse {
                    message: "unauthorized",
                    error: failure.reason(),
                    request_id: request_id.into_string(),
                };

                let mut response = (StatusCode::UNAUTHORIZED, Json(body)).into_response();
                response.headers_mut().insert(
                    header::WWW_AUTHENTICATE,
                    HeaderValue::from_static(WWW_AUTHENTICATE_CHALLENGE),
                );
                response
            }
        }
    }
}
