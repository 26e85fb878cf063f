//! Service configuration module
//! Handles token secrets, expirations and cookie parameters for the auth server

use crate::constants::{
    DEFAULT_ACCESS_TTL_SECS, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_REFRESH_TTL_SECS,
};
use crate::error::{Result, RustyGateError};
use std::env;
use std::time::Duration;

/// Authentication service configuration parameters
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub host: String,
    pub port: u16,
    /// Secret for signing/validating access tokens
    pub access_token_secret: String,
    /// Access token lifetime
    pub access_token_ttl: Duration,
    /// Secret for signing/validating refresh tokens (separate from access for security)
    pub refresh_token_secret: String,
    /// Refresh token lifetime
    pub refresh_token_ttl: Duration,
    /// Max-Age applied to the refresh token cookie
    pub cookie_max_age: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        panic!("AuthConfig::default() is not allowed for security reasons. Use AuthConfig::from_env() instead.");
    }
}

impl AuthConfig {
    /// Create a test configuration - DANGEROUS: Only for testing!
    #[cfg(test)]
    pub fn for_testing() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            access_token_secret: "test-access-secret-only-for-unit-tests-0123456789".to_string(),
            access_token_ttl: Duration::from_secs(DEFAULT_ACCESS_TTL_SECS),
            refresh_token_secret: "test-refresh-secret-only-for-unit-tests-0123456789".to_string(),
            refresh_token_ttl: Duration::from_secs(DEFAULT_REFRESH_TTL_SECS),
            cookie_max_age: Duration::from_secs(DEFAULT_REFRESH_TTL_SECS),
        }
    }

    /// Validate that a secret meets security requirements
    fn validate_secret(secret: &str, secret_type: &str) -> Result<()> {
        if secret.len() < 32 {
            return Err(RustyGateError::ConfigError(format!(
                "{} secret must be at least 32 characters long",
                secret_type
            )));
        }

        // Check for insecure default or example values
        let insecure_patterns = [
            "your-secret-key",
            "change-this",
            "INSECURE-DEFAULT-FOR-TESTING-ONLY",
            "default",
            "secret",
            "password",
            "12345",
        ];

        for pattern in &insecure_patterns {
            if secret.contains(pattern) {
                return Err(RustyGateError::ConfigError(format!(
                    "{} secret contains insecure pattern '{}'. Please use a secure random secret generated with: openssl rand -base64 32",
                    secret_type, pattern
                )));
            }
        }

        // Ensure some complexity
        if secret.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(RustyGateError::ConfigError(format!(
                "{} secret should contain mixed characters (letters, numbers, symbols) for security",
                secret_type
            )));
        }

        Ok(())
    }

    /// Ensure access and refresh secrets differ so a leaked token cannot be
    /// replayed across purposes
    fn validate_secrets_are_different(access_secret: &str, refresh_secret: &str) -> Result<()> {
        if access_secret == refresh_secret {
            return Err(RustyGateError::ConfigError(
                "Access and refresh token secrets must be different. Using the same secret for both purposes increases attack surface.".to_string()
            ));
        }
        Ok(())
    }

    /// Load configuration from environment variables if available
    pub fn from_env() -> Result<Self> {
        let host = env::var("RUSTY_GATE_HOST").unwrap_or(DEFAULT_HOST.to_string());
        let port = env::var("RUSTY_GATE_PORT")
            .or_else(|_| env::var("PORT"))
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let access_token_secret = env::var("RUSTY_GATE_ACCESS_TOKEN_SECRET")
            .or_else(|_| env::var("ACCESS_TOKEN_SECRET"))
            .map_err(|_| {
                RustyGateError::ConfigError(
                    "ACCESS_TOKEN_SECRET environment variable is required for security. \
                     Generate one with: openssl rand -base64 32"
                        .to_string(),
                )
            })?;

        let refresh_token_secret = env::var("RUSTY_GATE_REFRESH_TOKEN_SECRET")
            .or_else(|_| env::var("REFRESH_TOKEN_SECRET"))
            .map_err(|_| {
                RustyGateError::ConfigError(
                    "REFRESH_TOKEN_SECRET environment variable is required for security. \
                     Generate one with: openssl rand -base64 32 \
                     NOTE: refresh secret must be different from access secret."
                        .to_string(),
                )
            })?;

        let access_ttl_secs = env::var("RUSTY_GATE_ACCESS_TOKEN_TTL_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_ACCESS_TTL_SECS);

        let refresh_ttl_secs = env::var("RUSTY_GATE_REFRESH_TOKEN_TTL_SECS")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(DEFAULT_REFRESH_TTL_SECS);

        // Cookie lifetime defaults to the refresh token lifetime
        let cookie_max_age_secs = env::var("RUSTY_GATE_COOKIE_MAX_AGE_SECS")
            .or_else(|_| env::var("COOKIE_TIME"))
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(refresh_ttl_secs);

        // Validate both secrets
        Self::validate_secret(&access_token_secret, "Access token")?;
        Self::validate_secret(&refresh_token_secret, "Refresh token")?;
        Self::validate_secrets_are_different(&access_token_secret, &refresh_token_secret)?;

        Ok(Self {
            host,
            port,
            access_token_secret,
            access_token_ttl: Duration::from_secs(access_ttl_secs),
            refresh_token_secret,
            refresh_token_ttl: Duration::from_secs(refresh_ttl_secs),
            cookie_max_age: Duration::from_secs(cookie_max_age_secs),
        })
    }
}
