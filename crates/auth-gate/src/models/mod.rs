//! Response bodies for Auth Gate endpoints.
//!
//! Every body carries the request's correlation id.

use serde::Serialize;

/// Response for `GET /`.
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub request_id: String,
}

/// Response for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub request_id: String,
}

/// Response for a successful `GET /validate`.
#[derive(Debug, Serialize)]
pub struct AuthorizedResponse {
    pub message: &'static str,
    pub request_id: String,
}

/// Response for a rejected `GET /validate`.
#[derive(Debug, Serialize)]
pub struct UnauthorizedResponse {
    pub message: &'static str,
    /// Machine-readable failure reason.
    pub error: &'static str,
    pub request_id: String,
}

/// Body for error responses produced outside the handlers (unknown route,
/// wrong method, request timeout).
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    pub request_id: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_response_serialization() {
        let body = UnauthorizedResponse {
            message: "unauthorized",
            error: "token missing",
            request_id: "req-1".to_string(),
        };

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["message"], "unauthorized");
        assert_eq!(json["error"], "token missing");
        assert_eq!(json["request_id"], "req-1");
    }

    #[test]
    fn test_health_response_serialization() {
        let body = HealthResponse {
            status: "healthy",
            service: "auth-service",
            request_id: "req-2".to_string(),
        };

        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(json.contains("\"service\":\"auth-service\""));
        assert!(json.contains("\"request_id\":\"req-2\""));
    }
}
