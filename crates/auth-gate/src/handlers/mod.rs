//! HTTP request handlers for Auth Gate.

pub mod health;
pub mod validate;

pub use health::{health_check, index};
pub use validate::validate;
