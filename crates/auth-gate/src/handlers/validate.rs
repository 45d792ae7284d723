//! Forward-auth handler.
//!
//! The upstream proxy calls `GET /validate` with the caller's cookies and
//! admits the request on 200, rejects it on 401.

use crate::errors::AuthGateError;
use crate::middleware::RequestId;
use crate::models::AuthorizedResponse;
use crate::routes::AppState;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::{Extension, Json};
use common::jwt::FailureKind;
use std::sync::Arc;
use tracing::instrument;

/// Name of the cookie carrying the token.
pub const TOKEN_COOKIE: &str = "token";

/// Verify the `token` cookie.
///
/// # Response
///
/// - 200 `{"message":"authorized"}` when the token verifies
/// - 401 `{"message":"unauthorized","error":<reason>}` otherwise
#[instrument(skip_all, name = "auth_gate.handlers.validate")]
pub async fn validate(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    headers: HeaderMap,
) -> Result<Json<AuthorizedResponse>, AuthGateError> {
    let Some(token) = cookie_value(&headers, TOKEN_COOKIE) else {
        tracing::debug!(target: "auth_gate.handlers.validate", "No token cookie");
        return Err(AuthGateError::unauthorized(
            FailureKind::TokenMissing,
            request_id,
        ));
    };

    if let Err(failure) = state.verifier.verify(token).await.into_result() {
        return Err(AuthGateError::unauthorized(failure, request_id));
    }

    Ok(Json(AuthorizedResponse {
        message: "authorized",
        request_id: request_id.into_string(),
    }))
}

/// First value of cookie `name` across all `Cookie` headers.
fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"'))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(cookies: &[&'static str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for cookie in cookies {
            map.append(header::COOKIE, HeaderValue::from_static(cookie));
        }
        map
    }

    #[test]
    fn test_cookie_value_single() {
        let h = headers(&["token=abc.def.ghi"]);
        assert_eq!(cookie_value(&h, "token"), Some("abc.def.ghi"));
    }

    #[test]
    fn test_cookie_value_among_others() {
        let h = headers(&["theme=dark; token=abc; lang=en"]);
        assert_eq!(cookie_value(&h, "token"), Some("abc"));
    }

    #[test]
    fn test_cookie_value_across_headers() {
        let h = headers(&["theme=dark", "token=xyz"]);
        assert_eq!(cookie_value(&h, "token"), Some("xyz"));
    }

    #[test]
    fn test_cookie_value_first_wins() {
        let h = headers(&["token=first; token=second"]);
        assert_eq!(cookie_value(&h, "token"), Some("first"));
    }

    #[test]
    fn test_cookie_value_name_must_match_exactly() {
        let h = headers(&["mytoken=abc; token_v2=def"]);
        assert_eq!(cookie_value(&h, "token"), None);
    }

    #[test]
    fn test_cookie_value_absent() {
        assert_eq!(cookie_value(&HeaderMap::new(), "token"), None);
    }

    #[test]
    fn test_cookie_value_empty() {
        let h = headers(&["token="]);
        assert_eq!(cookie_value(&h, "token"), Some(""));
    }

    #[test]
    fn test_cookie_value_quoted() {
        let h = headers(&["token=\"abc\""]);
        assert_eq!(cookie_value(&h, "token"), Some("abc"));
    }

    #[test]
    fn test_cookie_value_keeps_padding_characters() {
        let h = headers(&["token=a=b=="]);
        assert_eq!(cookie_value(&h, "token"), Some("a=b=="));
    }
}
