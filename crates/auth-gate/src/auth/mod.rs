//! Authentication module for Auth Gate.
//!
//! # Components
//!
//! - `jwt` - HS256 token verification against the shared secret

pub mod jwt;

pub use jwt::{TokenVerifier, Verdict};
