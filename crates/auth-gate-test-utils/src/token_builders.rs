//! Builder patterns for test token construction
//!
//! Provides a fluent API for signing tokens with arbitrary claims, including
//! deliberately broken ones.

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Map, Value};

/// Builder for signed test tokens.
///
/// Defaults to a valid HS256 token for `test-subject`, issued now and
/// expiring in one hour.
///
/// # Example
/// ```rust,ignore
/// let token = TestTokenBuilder::new()
///     .for_user("alice")
///     .with_issuer("https://issuer.example")
///     .expires_in(3600)
///     .sign(TEST_SECRET);
/// ```
#[derive(Debug, Clone)]
pub struct TestTokenBuilder {
    sub: Option<String>,
    iat: Option<i64>,
    exp: Option<i64>,
    iss: Option<String>,
    algorithm: Algorithm,
}

impl TestTokenBuilder {
    /// Create a new token builder with defaults
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            sub: Some("test-subject".to_string()),
            iat: Some(now.timestamp()),
            exp: Some((now + Duration::seconds(3600)).timestamp()),
            iss: None,
            algorithm: Algorithm::HS256,
        }
    }

    /// Set the subject
    pub fn for_user(mut self, subject: &str) -> Self {
        self.sub = Some(subject.to_string());
        self
    }

    /// Omit the `sub` claim
    pub fn without_subject(mut self) -> Self {
        self.sub = None;
        self
    }

    /// Set expiration in seconds from now (negative for already expired)
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.exp = Some((Utc::now() + Duration::seconds(seconds)).timestamp());
        self
    }

    /// Set the absolute expiration timestamp
    pub fn expires_at(mut self, timestamp: i64) -> Self {
        self.exp = Some(timestamp);
        self
    }

    /// Omit the `exp` claim
    pub fn without_expiry(mut self) -> Self {
        self.exp = None;
        self
    }

    /// Set issued-at timestamp
    pub fn issued_at(mut self, timestamp: i64) -> Self {
        self.iat = Some(timestamp);
        self
    }

    /// Omit the `iat` claim
    pub fn without_issued_at(mut self) -> Self {
        self.iat = None;
        self
    }

    /// Set the `iss` claim
    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.iss = Some(issuer.to_string());
        self
    }

    /// Sign with a different HMAC algorithm
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Build the claims as a JSON value
    pub fn build_claims(&self) -> Value {
        let mut claims = Map::new();
        if let Some(sub) = &self.sub {
            claims.insert("sub".to_string(), json!(sub));
        }
        if let Some(iat) = self.iat {
            claims.insert("iat".to_string(), json!(iat));
        }
        if let Some(exp) = self.exp {
            claims.insert("exp".to_string(), json!(exp));
        }
        if let Some(iss) = &self.iss {
            claims.insert("iss".to_string(), json!(iss));
        }
        Value::Object(claims)
    }

    /// Sign the claims with `secret`
    pub fn sign(&self, secret: &str) -> String {
        sign_claims(&self.build_claims(), secret, self.algorithm)
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Sign arbitrary claims, for shapes the builder cannot express.
pub fn sign_claims(claims: &Value, secret: &str, algorithm: Algorithm) -> String {
    encode(
        &Header::new(algorithm),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("HMAC signing with a byte secret cannot fail")
}
