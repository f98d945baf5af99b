//! Token providers for remote solvers.
//!
//! Tokens are always injected: read from the environment or handed over
//! from configuration. They never appear in `Debug` output.

use std::fmt;

use crate::error::{HalError, HalResult};

/// Environment variable holding the Leap API token.
pub const DWAVE_TOKEN_ENV: &str = "DWAVE_API_TOKEN";

/// Token provider trait for dependency injection.
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    /// Get a valid access token.
    async fn get_token(&self) -> HalResult<String>;

    /// Check if authentication is available.
    fn has_valid_token(&self) -> bool;
}

/// Environment variable token provider.
#[derive(Debug, Clone)]
pub struct EnvTokenProvider {
    env_var: String,
}

impl EnvTokenProvider {
    /// Create a new environment variable token provider.
    pub fn new(env_var: impl Into<String>) -> Self {
        Self {
            env_var: env_var.into(),
        }
    }

    /// Create provider for `DWAVE_API_TOKEN`.
    pub fn dwave() -> Self {
        Self::new(DWAVE_TOKEN_ENV)
    }

    /// Name of the variable this provider reads.
    pub fn env_var(&self) -> &str {
        &self.env_var
    }
}

#[async_trait::async_trait]
impl TokenProvider for EnvTokenProvider {
    async fn get_token(&self) -> HalResult<String> {
        match std::env::var(&self.env_var) {
            Ok(token) if !token.trim().is_empty() => Ok(token),
            Ok(_) => Err(HalError::Auth(format!(
                "Environment variable {} is empty",
                self.env_var
            ))),
            Err(_) => Err(HalError::Auth(format!(
                "Environment variable {} not set",
                self.env_var
            ))),
        }
    }

    fn has_valid_token(&self) -> bool {
        std::env::var(&self.env_var).is_ok_and(|t| !t.trim().is_empty())
    }
}

/// Token provider wrapping a token taken from configuration.
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    /// Wrap a token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[async_trait::async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token(&self) -> HalResult<String> {
        if self.token.trim().is_empty() {
            return Err(HalError::Auth("configured token is empty".into()));
        }
        Ok(self.token.clone())
    }

    fn has_valid_token(&self) -> bool {
        !self.token.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_env_token_provider() {
        // SAFETY: test-specific variable, not read by any other test
        unsafe {
            std::env::set_var("RAPQ_TEST_TOKEN_VAR_12345", "test-token-value");
        }
        let provider = EnvTokenProvider::new("RAPQ_TEST_TOKEN_VAR_12345");
        assert!(provider.has_valid_token());
        assert_eq!(provider.get_token().await.unwrap(), "test-token-value");

        let missing = EnvTokenProvider::new("RAPQ_NONEXISTENT_VAR_12345");
        assert!(!missing.has_valid_token());
        assert!(matches!(missing.get_token().await, Err(HalError::Auth(_))));

        // SAFETY: cleaning up test variable
        unsafe {
            std::env::remove_var("RAPQ_TEST_TOKEN_VAR_12345");
        }
    }

    #[test]
    fn test_dwave_provider_reads_standard_variable() {
        assert_eq!(EnvTokenProvider::dwave().env_var(), "DWAVE_API_TOKEN");
    }

    #[tokio::test]
    async fn test_static_token_provider() {
        let provider = StaticTokenProvider::new("abc");
        assert!(provider.has_valid_token());
        assert_eq!(provider.get_token().await.unwrap(), "abc");
        assert!(!format!("{provider:?}").contains("abc"));

        let empty = StaticTokenProvider::new("  ");
        assert!(!empty.has_valid_token());
        assert!(empty.get_token().await.is_err());
    }
}
