//! Common building blocks shared by the auth-gate crates.

#![warn(clippy::pedantic)]

/// Module for resolving and validating the shared signing secret
pub mod secret;

/// Module for JWT claim rules and the verification failure taxonomy
pub mod jwt;
