//! Middleware for Auth Gate.
//!
//! # Components
//!
//! - `request_id` - Correlation id assignment and echo
//! - `error_body` - JSON bodies for routing and timeout errors
//! - `trace` - Per-request structured logging

pub mod error_body;
pub mod request_id;
pub mod trace;

pub use error_body::json_error_body;
pub use request_id::{request_id, RequestId, REQUEST_ID_HEADER};
pub use trace::http_trace_layer;
