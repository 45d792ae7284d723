//! JSON bodies for framework-generated error responses.
//!
//! Routing misses (404, 405) and `TimeoutLayer` expiry (408) come back with
//! an empty body. This middleware fills in `{"message", "request_id"}` so
//! every error response carries the correlation id like the handlers do.
//! Responses that are already JSON pass through untouched.

use crate::middleware::RequestId;
use crate::models::ErrorResponse;
use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

/// Replace the body of non-JSON 4xx/5xx responses.
///
/// Must run inside the `request_id` middleware.
pub async fn json_error_body(req: Request, next: Next) -> Response {
    let request_id = req.extensions().get::<RequestId>().cloned();
    let response = next.run(req).await;

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) || is_json(&response) {
        return response;
    }

    let request_id = request_id.unwrap_or_else(RequestId::generate);
    let body = ErrorResponse {
        message: status
            .canonical_reason()
            .unwrap_or("error")
            .to_ascii_lowercase(),
        request_id: request_id.into_string(),
    };

    let (mut parts, _) = response.into_parts();
    let (json_parts, json_body) = Json(body).into_response().into_parts();

    parts.headers.remove(header::CONTENT_LENGTH);
    if let Some(content_type) = json_parts.headers.get(header::CONTENT_TYPE) {
        parts
            .headers
            .insert(header::CONTENT_TYPE, content_type.clone());
    }

    Response::from_parts(parts, json_body)
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value: &HeaderValue| value.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::middleware::{request_id, REQUEST_ID_HEADER};
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::time::Duration;
    use tower::ServiceExt;
    use tower_http::timeout::TimeoutLayer;

    async fn slow() -> &'static str {
        tokio::time::sleep(Duration::from_secs(5)).await;
        "too late"
    }

    async fn already_json() -> (StatusCode, Json<Value>) {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "error": "kept" })),
        )
    }

    fn test_app() -> Router {
        Router::new()
            .route("/ok", get(|| async { "OK" }))
            .route("/slow", get(slow))
            .route("/json", get(already_json))
            .layer(TimeoutLayer::new(Duration::from_millis(50)))
            .layer(middleware::from_fn(json_error_body))
            .layer(middleware::from_fn(request_id))
    }

    async fn call(request: HttpRequest<Body>) -> (StatusCode, Option<String>, Value) {
        let response = test_app().oneshot(request).await.unwrap();
        let status = response.status();
        let header = response
            .headers()
            .get(REQUEST_ID_HEADER)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, header, body)
    }

    fn get_request(uri: &str) -> HttpRequest<Body> {
        HttpRequest::builder()
            .uri(uri)
            .header(REQUEST_ID_HEADER, "corr-9")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_not_found_gets_json_body() {
        let (status, header, body) = call(get_request("/missing")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(header.as_deref(), Some("corr-9"));
        assert_eq!(body["message"], "not found");
        assert_eq!(body["request_id"], "corr-9");
    }

    #[tokio::test]
    async fn test_method_not_allowed_gets_json_body() {
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/ok")
            .body(Body::empty())
            .unwrap();
        let (status, header, body) = call(request).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["message"], "method not allowed");
        assert_eq!(body["request_id"].as_str(), header.as_deref());
    }

    #[tokio::test]
    async fn test_timeout_gets_json_body() {
        let (status, header, body) = call(get_request("/slow")).await;

        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(header.as_deref(), Some("corr-9"));
        assert_eq!(body["message"], "request timeout");
        assert_eq!(body["request_id"], "corr-9");
    }

    #[tokio::test]
    async fn test_json_errors_pass_through() {
        let (status, _, body) = call(get_request("/json")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "kept");
        assert!(body.get("request_id").is_none());
    }

    #[tokio::test]
    async fn test_success_untouched() {
        let response = test_app().oneshot(get_request("/ok")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(bytes.as_ref(), b"OK");
    }
}
