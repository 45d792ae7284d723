//! Auth Gate Service Library
//!
//! A forward-auth sidecar: the reverse proxy in front of a web application
//! asks `GET /validate` whether the caller's `token` cookie holds a valid
//! HS256 token signed with the shared secret, and admits or rejects the
//! request on the answer. Tokens are never issued here.
//!
//! # Architecture
//!
//! ```text
//! routes/mod.rs -> handlers/*.rs -> auth/jwt.rs -> common::{secret, jwt}
//! ```
//!
//! # Modules
//!
//! - `auth` - Token Verifier
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `health_check` - `--health-check` probe client
//! - `middleware` - Correlation id and request logging
//! - `models` - Response bodies
//! - `observability` - Tracing subscriber setup
//! - `routes` - Axum router setup

pub mod auth;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod health_check;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod routes;
