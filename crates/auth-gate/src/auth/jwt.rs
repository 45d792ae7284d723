//! HS256 token verification.
//!
//! Verifies tokens signed elsewhere with the shared secret and enforces the
//! claim rules from [`common::jwt`].
//!
//! # Security
//!
//! - The secret is resolved on every call (rotation without restart)
//! - Tokens are size-checked BEFORE parsing
//! - The accepted algorithm is pinned to HS256; a token declaring any other
//!   algorithm is rejected even when its signature would verify
//! - Time checks are exact and done here, not by `jsonwebtoken`
//! - Tokens, secrets and claim values are never logged

use common::jwt::{Claims, FailureKind, RawClaims, MAX_TOKEN_LENGTH_BYTES, REQUIRED_ALGORITHM};
use common::secret::{check_strength, EnvSource, ExposeSecret, SecretResolver};
use jsonwebtoken::{decode, DecodingKey, Validation};
use tracing::instrument;

/// Outcome of a single verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    /// Whether the caller is authenticated.
    pub authenticated: bool,

    /// Why not, when `authenticated` is false.
    pub failure: Option<FailureKind>,
}

impl Verdict {
    /// A successful verification.
    pub fn authenticated() -> Self {
        Self {
            authenticated: true,
            failure: None,
        }
    }

    /// A failed verification.
    pub fn rejected(kind: FailureKind) -> Self {
        Self {
            authenticated: false,
            failure: Some(kind),
        }
    }

    /// Convert to a `Result` for `?`-style handling.
    pub fn into_result(self) -> Result<(), FailureKind> {
        match self.failure {
            Some(kind) => Err(kind),
            None => Ok(()),
        }
    }
}

impl From<Result<Claims, FailureKind>> for Verdict {
    fn from(result: Result<Claims, FailureKind>) -> Self {
        match result {
            Ok(_) => Verdict::authenticated(),
            Err(kind) => Verdict::rejected(kind),
        }
    }
}

/// Verifies bearer tokens against the shared secret.
///
/// Stateless across calls; safe to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    /// Resolver for the signing secret.
    resolver: SecretResolver,

    /// Name of the secret variable.
    secret_env: String,

    /// Name of the expected-issuer variable.
    issuer_env: String,
}

impl TokenVerifier {
    /// Create a new verifier.
    ///
    /// # Arguments
    ///
    /// * `resolver` - Resolver used for the secret and the expected issuer
    /// * `secret_env` - Name of the secret variable
    /// * `issuer_env` - Name of the expected-issuer variable
    pub fn new(resolver: SecretResolver, secret_env: String, issuer_env: String) -> Self {
        Self {
            resolver,
            secret_env,
            issuer_env,
        }
    }

    /// Verify `token` against the current wall clock.
    pub async fn verify(&self, token: &str) -> Verdict {
        self.verify_at(token, chrono::Utc::now().timestamp()).await
    }

    /// Verify `token` as of `now` (Unix epoch seconds).
    ///
    /// # Checks (each short-circuits)
    ///
    /// 1. Secret resolves and meets the strength bar
    /// 2. Token is non-blank and at most 4096 bytes
    /// 3. Signature verifies with HS256 and the header declares HS256
    /// 4. `exp` present and in the future
    /// 5. `iat` present and not in the future
    /// 6. `sub` present and non-blank
    /// 7. `iss` matches, if an issuer is configured
    #[instrument(skip_all, name = "auth_gate.auth.verify")]
    pub async fn verify_at(&self, token: &str, now: i64) -> Verdict {
        self.claims_at(token, now).await.into()
    }

    /// Same as [`Self::verify_at`] but returns the validated claims.
    ///
    /// # Errors
    ///
    /// Returns the [`FailureKind`] of the first failed check.
    pub async fn claims_at(&self, token: &str, now: i64) -> Result<Claims, FailureKind> {
        // 1. Secret
        let secret = check_strength(&self.secret_env, self.resolver.resolve(&self.secret_env).await)
            .map_err(|e| {
                tracing::warn!(
                    target: "auth_gate.auth.jwt",
                    error = %e,
                    "No usable signing secret; rejecting token"
                );
                FailureKind::SecretMissing
            })?;

        // 2. Cheap shape checks before any crypto
        if token.trim().is_empty() {
            tracing::debug!(target: "auth_gate.auth.jwt", "Token rejected: empty");
            return Err(FailureKind::TokenMissing);
        }
        if token.len() > MAX_TOKEN_LENGTH_BYTES {
            tracing::debug!(
                target: "auth_gate.auth.jwt",
                token_size = token.len(),
                max_size = MAX_TOKEN_LENGTH_BYTES,
                "Token rejected: size exceeds maximum allowed"
            );
            return Err(FailureKind::TokenTooLong);
        }

        // 3. Signature and algorithm
        let decoding_key = DecodingKey::from_secret(secret.expose_secret().as_bytes());
        let raw = decode::<RawClaims>(token, &decoding_key, &pinned_validation())
            .map_err(|e| {
                tracing::debug!(
                    target: "auth_gate.auth.jwt",
                    error_kind = ?e.kind(),
                    "Token rejected: signature verification failed"
                );
                FailureKind::InvalidSignature
            })?
            .claims;

        // 4-7. Claim rules
        let expected_issuer = self
            .resolver
            .env()
            .var(&self.issuer_env)
            .filter(|iss| !iss.is_empty());

        let claims = raw.validate_at(now, expected_issuer.as_deref())?;

        tracing::debug!(target: "auth_gate.auth.jwt", "Token validated successfully");
        Ok(claims)
    }
}

/// `jsonwebtoken` validation that only checks the signature and algorithm.
///
/// Claim checks are disabled here because they run afterwards with exact
/// comparison and their own failure kinds.
fn pinned_validation() -> Validation {
    let mut validation = Validation::new(REQUIRED_ALGORITHM);
    validation.algorithms = vec![REQUIRED_ALGORITHM];
    validation.leeway = 0;
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation
}
