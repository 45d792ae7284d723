//! Request logging.
//!
//! One span per request carrying method, path, client address and the
//! correlation id; the response event adds status and latency. Tokens and
//! cookies are never recorded.

use crate::middleware::RequestId;
use axum::extract::ConnectInfo;
use axum::http::Request;
use std::net::SocketAddr;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, MakeSpan, TraceLayer};
use tower_http::LatencyUnit;
use tracing::{Level, Span};

/// Builds the per-request span.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let request_id = request
            .extensions()
            .get::<RequestId>()
            .map(RequestId::as_str)
            .unwrap_or_default();
        let client = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_default();

        tracing::info_span!(
            target: "auth_gate.http",
            "request",
            method = %request.method(),
            path = %request.uri().path(),
            client = %client,
            request_id = %request_id,
        )
    }
}

/// `TraceLayer` logging every response at INFO with latency in milliseconds.
///
/// Must sit inside the `request_id` middleware so the id is already present.
pub fn http_trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpan> {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan)
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}
