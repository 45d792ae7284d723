//! JWT claim rules and the verification failure taxonomy.
//!
//! This module owns everything about a token that does not need the signing
//! secret:
//! - Size and algorithm constants
//! - [`FailureKind`], the closed set of verification outcomes
//! - [`RawClaims`] (as decoded) and [`Claims`] (after the claim rules pass)
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing
//! - Only HS256 is accepted; the header's self-declared algorithm is never trusted
//! - Time checks are exact, with no clock skew tolerance
//! - The `sub` field in [`Claims`] is redacted in Debug output

use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Maximum accepted token length in bytes (4KB).
///
/// Checked before any base64 decoding or HMAC work.
pub const MAX_TOKEN_LENGTH_BYTES: usize = 4096;

/// The single accepted signing algorithm.
pub const REQUIRED_ALGORITHM: Algorithm = Algorithm::HS256;

// =============================================================================
// Failure taxonomy
// =============================================================================

/// Why a token was not accepted.
///
/// Every verification ends in exactly one of these or in success. None of
/// them is retried internally. `reason()` is safe to send to clients; it
/// never contains claim values or the secret.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No usable signing secret could be resolved.
    #[error("secret missing")]
    SecretMissing,

    /// The token is empty or whitespace.
    #[error("token missing")]
    TokenMissing,

    /// The token exceeds [`MAX_TOKEN_LENGTH_BYTES`].
    #[error("token too long")]
    TokenTooLong,

    /// Bad signature, malformed structure, or a non-HS256 algorithm.
    #[error("invalid token")]
    InvalidSignature,

    /// `exp` is absent or not in the future.
    #[error("token expired")]
    Expired,

    /// `iat` is absent or in the future.
    #[error("iat claim invalid")]
    IssuedAtInvalid,

    /// `sub` is absent or blank.
    #[error("sub claim missing")]
    SubjectMissing,

    /// `iss` does not equal the configured issuer.
    #[error("issuer mismatch")]
    IssuerMismatch,
}

impl FailureKind {
    /// Every variant, in verification order.
    pub const ALL: [FailureKind; 8] = [
        FailureKind::SecretMissing,
        FailureKind::TokenMissing,
        FailureKind::TokenTooLong,
        FailureKind::InvalidSignature,
        FailureKind::Expired,
        FailureKind::IssuedAtInvalid,
        FailureKind::SubjectMissing,
        FailureKind::IssuerMismatch,
    ];

    /// Short machine-readable reason for response bodies.
    #[must_use]
    pub fn reason(self) -> &'static str {
        match self {
            FailureKind::SecretMissing => "secret missing",
            FailureKind::TokenMissing => "token missing",
            FailureKind::TokenTooLong => "token too long",
            FailureKind::InvalidSignature => "invalid token",
            FailureKind::Expired => "token expired",
            FailureKind::IssuedAtInvalid => "iat claim invalid",
            FailureKind::SubjectMissing => "sub claim missing",
            FailureKind::IssuerMismatch => "issuer mismatch",
        }
    }
}

// =============================================================================
// Claims
// =============================================================================

/// A JWT `NumericDate`: seconds since the Unix epoch, integer or fractional.
///
/// Compared against the integer clock without rounding, so `exp = now + 0.5`
/// is still in the future and `iat = now + 0.5` is not yet valid.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NumericDate(f64);

impl NumericDate {
    /// Seconds since the epoch.
    #[must_use]
    pub fn as_secs_f64(self) -> f64 {
        self.0
    }

    /// Strictly later than `now`.
    #[must_use]
    pub fn is_after(self, now: i64) -> bool {
        self.0 > epoch_secs(now)
    }

    /// Equal to or earlier than `now`.
    #[must_use]
    pub fn is_at_or_before(self, now: i64) -> bool {
        self.0 <= epoch_secs(now)
    }
}

impl From<i64> for NumericDate {
    fn from(secs: i64) -> Self {
        NumericDate(epoch_secs(secs))
    }
}

impl From<f64> for NumericDate {
    fn from(secs: f64) -> Self {
        NumericDate(secs)
    }
}

impl PartialEq<i64> for NumericDate {
    fn eq(&self, other: &i64) -> bool {
        self.0 == epoch_secs(*other)
    }
}

// Epoch seconds up to 2^53 convert exactly.
#[allow(clippy::cast_precision_loss)]
fn epoch_secs(secs: i64) -> f64 {
    secs as f64
}

/// Claims exactly as decoded from a signature-verified token.
///
/// Every field is optional so that a missing claim maps to its own
/// [`FailureKind`] instead of a generic decode error.
#[derive(Clone, Default, Deserialize)]
pub struct RawClaims {
    pub sub: Option<String>,
    pub iat: Option<NumericDate>,
    pub exp: Option<NumericDate>,
    pub iss: Option<String>,
}

impl fmt::Debug for RawClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawClaims")
            .field("sub", &self.sub.as_ref().map(|_| "[REDACTED]"))
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .field("iss", &self.iss)
            .finish()
    }
}

/// Claims of a token that passed every rule.
#[derive(Clone, PartialEq, Serialize)]
pub struct Claims {
    /// Subject, never blank. Redacted in Debug output.
    pub sub: String,

    /// Issued-at timestamp, not in the future.
    pub iat: NumericDate,

    /// Expiration timestamp, strictly in the future.
    pub exp: NumericDate,

    /// Issuer, if the token carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl fmt::Debug for Claims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Claims")
            .field("sub", &"[REDACTED]")
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .field("iss", &self.iss)
            .finish()
    }
}

impl RawClaims {
    /// Apply the claim rules against `now` (Unix epoch seconds).
    ///
    /// Rules run in a fixed order and the first failure wins:
    /// 1. `exp` present and `now < exp`
    /// 2. `iat` present and `iat <= now`
    /// 3. `sub` present and not blank
    /// 4. `iss == expected_issuer`, only when an issuer is expected
    ///
    /// # Errors
    ///
    /// Returns the [`FailureKind`] of the first rule that fails.
    pub fn validate_at(self, now: i64, expected_issuer: Option<&str>) -> Result<Claims, FailureKind> {
        let exp = match self.exp {
            Some(exp) if exp.is_after(now) => exp,
            exp => {
                tracing::debug!(target: "common.jwt", present = exp.is_some(), "Token rejected: exp missing or passed");
                return Err(FailureKind::Expired);
            }
        };

        let iat = match self.iat {
            Some(iat) if iat.is_at_or_before(now) => iat,
            iat => {
                tracing::debug!(target: "common.jwt", present = iat.is_some(), "Token rejected: iat missing or in the future");
                return Err(FailureKind::IssuedAtInvalid);
            }
        };

        let sub = match self.sub {
            Some(sub) if !sub.trim().is_empty() => sub,
            _ => {
                tracing::debug!(target: "common.jwt", "Token rejected: sub missing or blank");
                return Err(FailureKind::SubjectMissing);
            }
        };

        if let Some(expected) = expected_issuer {
            if self.iss.as_deref() != Some(expected) {
                tracing::debug!(target: "common.jwt", "Token rejected: issuer mismatch");
                return Err(FailureKind::IssuerMismatch);
            }
        }

        Ok(Claims {
            sub,
            iat,
            exp,
            iss: self.iss,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
