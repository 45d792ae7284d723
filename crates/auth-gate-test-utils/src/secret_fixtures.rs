//! Deterministic secrets and environments for tests.

use std::collections::HashMap;

/// A secret exactly at the 32-byte minimum.
pub const TEST_SECRET: &str = "test-secret-0123456789abcdefghij";

/// A different valid secret, for wrong-key and rotation tests.
pub const OTHER_SECRET: &str = "other-secret-0123456789abcdefghi";

/// A secret one byte short of the minimum.
pub const WEAK_SECRET: &str = "weak-secret-0123456789abcdefghi";

/// Default secret variable name.
pub const SECRET_ENV: &str = "WEBUI_SECRET_KEY";

/// Default issuer variable name.
pub const ISSUER_ENV: &str = "WEBUI_JWT_ISSUER";

/// Build an environment map from pairs.
pub fn env_vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Environment with [`TEST_SECRET`] under the default variable.
pub fn secret_env() -> HashMap<String, String> {
    env_vars(&[(SECRET_ENV, TEST_SECRET)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::secret::MIN_SECRET_LENGTH;

    #[test]
    fn test_fixture_lengths() {
        assert_eq!(TEST_SECRET.len(), MIN_SECRET_LENGTH);
        assert_eq!(OTHER_SECRET.len(), MIN_SECRET_LENGTH);
        assert_eq!(WEAK_SECRET.len(), MIN_SECRET_LENGTH - 1);
        assert_ne!(TEST_SECRET, OTHER_SECRET);
    }

    #[test]
    fn test_secret_env() {
        assert_eq!(secret_env().get(SECRET_ENV).map(String::as_str), Some(TEST_SECRET));
    }
}
