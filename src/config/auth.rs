//! Authentication configuration (JWT cookie sessions)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// Minimum HS256 secret length accepted in production.
pub const MIN_PRODUCTION_SECRET_BYTES: usize = 32;

/// Authentication configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: SecretString,

    /// Access token lifetime in minutes
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: i64,

    /// Name of the cookie carrying the access token
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Mark the cookie `Secure`
    #[serde(default)]
    pub cookie_secure: bool,
}

impl AuthConfig {
    /// Validate authentication configuration
    ///
    /// Production requires a non-default secret of at least
    /// [`MIN_PRODUCTION_SECRET_BYTES`].
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        let secret = self.jwt_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        if *environment == Environment::Production
            && (secret.len() < MIN_PRODUCTION_SECRET_BYTES || secret == DEV_JWT_SECRET)
        {
            return Err(ValidationError::JwtSecretTooShort(MIN_PRODUCTION_SECRET_BYTES));
        }
        if !(1..=60 * 24 * 30).contains(&self.token_ttl_minutes) {
            return Err(ValidationError::InvalidTokenTtl);
        }
        if self.cookie_name.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__COOKIE_NAME"));
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_minutes: default_token_ttl(),
            cookie_name: default_cookie_name(),
            cookie_secure: false,
        }
    }
}

const DEV_JWT_SECRET: &str = "development-only-secret";

fn default_jwt_secret() -> SecretString {
    SecretString::new(DEV_JWT_SECRET.to_string())
}

fn default_token_ttl() -> i64 {
    30
}

fn default_cookie_name() -> String {
    "access_token".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_config_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.token_ttl_minutes, 30);
        assert_eq!(config.cookie_name, "access_token");
        assert!(!config.cookie_secure);
        assert!(config.validate(&Environment::Development).is_ok());
    }

    #[test]
    fn test_production_rejects_default_and_short_secrets() {
        let config = AuthConfig::default();
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::JwtSecretTooShort(32))
        );

        let short = AuthConfig {
            jwt_secret: SecretString::new("short".into()),
            ..Default::default()
        };
        assert!(short.validate(&Environment::Production).is_err());
        assert!(short.validate(&Environment::Staging).is_ok());
    }

    #[test]
    fn test_production_accepts_long_secret() {
        let config = AuthConfig {
            jwt_secret: SecretString::new("x".repeat(48)),
            cookie_secure: true,
            ..Default::default()
        };
        assert!(config.validate(&Environment::Production).is_ok());
    }

    #[test]
    fn test_ttl_bounds() {
        let config = AuthConfig {
            token_ttl_minutes: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidTokenTtl)
        );
    }
}
