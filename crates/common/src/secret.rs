//! Shared signing secret resolution.
//!
//! The signing secret is read from the environment on every call so that a
//! rotated value (or a rewritten secret file) takes effect without a restart.
//!
//! Resolution order for a variable `NAME`:
//!
//! 1. `NAME` itself, if set and non-empty (used verbatim).
//! 2. `NAME_FILE`, if set: the file is read and surrounding whitespace trimmed.
//!
//! Any I/O failure on the file branch (missing file, permission denied, read
//! timeout) resolves to "absent". Callers treat absence uniformly.
//!
//! Secrets are carried as [`SecretString`] so that `Debug` output and tracing
//! fields are redacted:
//!
//! ```rust
//! use common::secret::SecretString;
//!
//! let secret = SecretString::from("hunter2");
//! assert!(!format!("{secret:?}").contains("hunter2"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub use secrecy::{ExposeSecret, SecretString};

/// Minimum secret length in bytes, measured after trimming whitespace.
pub const MIN_SECRET_LENGTH: usize = 32;

/// Suffix appended to a secret variable name to locate its file indirection.
pub const FILE_SUFFIX: &str = "_FILE";

/// Upper bound on reading a secret file.
pub const SECRET_FILE_READ_TIMEOUT: Duration = Duration::from_secs(3);

// =============================================================================
// Environment seam
// =============================================================================

/// Read-only view of environment variables.
///
/// Production code uses [`ProcessEnv`]; tests pass a `HashMap` so they never
/// mutate process-global state.
pub trait EnvSource: Send + Sync {
    /// Returns the value of `name`, or `None` if unset or not valid unicode.
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<T: EnvSource + ?Sized> EnvSource for Arc<T> {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Startup validation failures for the signing secret.
///
/// Display strings are operator-facing diagnostics. They name the variable
/// and the offending length, never the value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SecretError {
    /// Neither `NAME` nor `NAME_FILE` yielded a value.
    #[error("CRITICAL: {name} environment variable not set (set {name} or {name}_FILE)")]
    NotSet { name: String },

    /// A value was found but it contains only whitespace.
    #[error("{name} is whitespace only: {length} chars, none of them usable; a non-blank secret of at least {required} characters is required")]
    WhitespaceOnly {
        name: String,
        length: usize,
        required: usize,
    },

    /// A value was found but it is shorter than [`MIN_SECRET_LENGTH`].
    #[error("{name} too short: {length} chars, {required} characters required")]
    TooShort {
        name: String,
        length: usize,
        required: usize,
    },
}

impl SecretError {
    /// Whether some value was found in the environment.
    #[must_use]
    pub fn is_present(&self) -> bool {
        !matches!(self, SecretError::NotSet { .. })
    }

    /// Whether a value was found but rejected as too weak.
    #[must_use]
    pub fn is_too_weak(&self) -> bool {
        matches!(
            self,
            SecretError::WhitespaceOnly { .. } | SecretError::TooShort { .. }
        )
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// Resolves the shared signing secret from an [`EnvSource`].
///
/// Holds no cached secret; every call goes back to the source.
#[derive(Clone)]
pub struct SecretResolver {
    env: Arc<dyn EnvSource>,
    file_read_timeout: Duration,
}

impl fmt::Debug for SecretResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretResolver")
            .field("file_read_timeout", &self.file_read_timeout)
            .finish_non_exhaustive()
    }
}

impl SecretResolver {
    /// Create a resolver over the given environment.
    pub fn new(env: Arc<dyn EnvSource>) -> Self {
        Self {
            env,
            file_read_timeout: SECRET_FILE_READ_TIMEOUT,
        }
    }

    /// Override the secret file read timeout.
    #[must_use]
    pub fn with_file_read_timeout(mut self, timeout: Duration) -> Self {
        self.file_read_timeout = timeout;
        self
    }

    /// The environment this resolver reads from.
    pub fn env(&self) -> &dyn EnvSource {
        self.env.as_ref()
    }

    /// Resolve `name`, falling back to the file named by `name_FILE`.
    ///
    /// Returns `None` when neither source yields a non-empty value.
    pub async fn resolve(&self, name: &str) -> Option<SecretString> {
        if let Some(value) = self.env.var(name).filter(|v| !v.is_empty()) {
            return Some(SecretString::from(value));
        }

        let file_var = format!("{name}{FILE_SUFFIX}");
        let path = self.env.var(&file_var).filter(|p| !p.is_empty())?;

        let contents =
            match tokio::time::timeout(self.file_read_timeout, tokio::fs::read_to_string(&path))
                .await
            {
                Ok(Ok(contents)) => contents,
                Ok(Err(e)) => {
                    tracing::debug!(
                        target: "common.secret",
                        variable = %file_var,
                        path = %path,
                        error = %e,
                        "Secret file unreadable"
                    );
                    return None;
                }
                Err(_) => {
                    tracing::warn!(
                        target: "common.secret",
                        variable = %file_var,
                        path = %path,
                        timeout_ms = self.file_read_timeout.as_millis(),
                        "Secret file read timed out"
                    );
                    return None;
                }
            };

        let trimmed = contents.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(SecretString::from(trimmed.to_string()))
    }

    /// Resolve `name` and enforce the minimum strength bar.
    ///
    /// Run once before serving traffic; any error is fatal at startup.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError`] distinguishing an unset, whitespace-only, or
    /// too-short secret.
    pub async fn validate_startup(&self, name: &str) -> Result<SecretString, SecretError> {
        check_strength(name, self.resolve(name).await)
    }
}

/// Apply the strength rules to an already-resolved secret.
///
/// # Errors
///
/// See [`SecretResolver::validate_startup`].
pub fn check_strength(name: &str, secret: Option<SecretString>) -> Result<SecretString, SecretError> {
    let Some(secret) = secret else {
        return Err(SecretError::NotSet {
            name: name.to_string(),
        });
    };

    let raw = secret.expose_secret();
    let length = raw.trim().len();
    if length == 0 {
        return Err(SecretError::WhitespaceOnly {
            name: name.to_string(),
            length: raw.len(),
            required: MIN_SECRET_LENGTH,
        });
    }
    if length < MIN_SECRET_LENGTH {
        return Err(SecretError::TooShort {
            name: name.to_string(),
            length,
            required: MIN_SECRET_LENGTH,
        });
    }

    Ok(secret)
}
