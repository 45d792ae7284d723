//! # Auth Gate Test Utilities
//!
//! Shared test utilities for the Auth Gate service.
//!
//! This crate provides:
//! - Token builders (`TestTokenBuilder`) that sign HS256/HS384/HS512 tokens
//! - Deterministic secret fixtures
//! - Server test harness (`TestAuthGateServer` for E2E tests)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use auth_gate_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<()> {
//!     let server = TestAuthGateServer::spawn(secret_env()).await?;
//!     let token = TestTokenBuilder::new().for_user("alice").sign(TEST_SECRET);
//!
//!     let response = reqwest::Client::new()
//!         .get(format!("{}/validate", server.url()))
//!         .header("cookie", format!("token={token}"))
//!         .send()
//!         .await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod secret_fixtures;
pub mod server_harness;
pub mod token_builders;

// Re-export commonly used items
pub use secret_fixtures::*;
pub use server_harness::*;
pub use token_builders::*;
