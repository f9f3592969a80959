//! HS256 JWT access tokens.
//!
//! `JwtTokenService` is both the `TokenIssuer` used by signup/login and the
//! `SessionValidator` used by the HTTP middleware. Tokens carry only the
//! account id (`sub`) and expiry; the rest of the identity is read from the
//! user store on every validation, so a deleted account stops authenticating
//! immediately.

use async_trait::async_trait;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::foundation::{AuthError, AuthenticatedUser, Timestamp, UserId};
use crate::ports::{IssuedToken, SessionValidator, TokenIssuer, UserRepository};

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AccessClaims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Issues and validates HS256 access tokens.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_minutes: i64,
    users: Arc<dyn UserRepository>,
}

impl JwtTokenService {
    pub fn new(secret: &SecretString, ttl_minutes: i64, users: Arc<dyn UserRepository>) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(bytes),
            decoding_key: DecodingKey::from_secret(bytes),
            ttl_minutes,
            users,
        }
    }

    fn decode_claims(&self, token: &str) -> Result<AccessClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        decode::<AccessClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => {
                        tracing::debug!("Token expired");
                        AuthError::TokenExpired
                    }
                    _ => {
                        tracing::debug!("Token validation failed: {}", e);
                        AuthError::InvalidToken
                    }
                }
            })
    }
}

impl TokenIssuer for JwtTokenService {
    fn issue(&self, user_id: &UserId) -> Result<IssuedToken, AuthError> {
        let now = Timestamp::now();
        let expires_at = now.plus_minutes(self.ttl_minutes);
        let claims = AccessClaims {
            sub: user_id.as_str().to_string(),
            iat: now.as_unix_secs(),
            exp: expires_at.as_unix_secs(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::IssuanceFailed(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }
}

#[async_trait]
impl SessionValidator for JwtTokenService {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let claims = self.decode_claims(token)?;
        let user_id = UserId::new(claims.sub).map_err(|_| AuthError::InvalidToken)?;

        let account = self
            .users
            .find_by_id(&user_id)
            .await
            .map_err(|e| AuthError::service_unavailable(e.to_string()))?
            .ok_or(AuthError::UserNotFound)?;

        Ok(AuthenticatedUser::new(
            account.id().clone(),
            account.email().as_str(),
            Some(account.name().to_string()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryUserRepository;
    use crate::domain::account::{Email, UserAccount};

    const SECRET: &str = "test-secret-that-is-at-least-32-bytes-long";

    async fn service_with_user(ttl_minutes: i64) -> (JwtTokenService, UserId) {
        let users = Arc::new(InMemoryUserRepository::new());
        let account = UserAccount::register(
            UserId::generate(),
            "Alice",
            Email::new("alice@example.com").unwrap(),
            "hash",
        )
        .unwrap();
        users.create(&account).await.unwrap();

        let service =
            JwtTokenService::new(&SecretString::new(SECRET.to_string()), ttl_minutes, users);
        (service, account.id().clone())
    }

    #[tokio::test]
    async fn issued_token_validates_to_same_user() {
        let (service, user_id) = service_with_user(30).await;

        let issued = service.issue(&user_id).unwrap();
        let user = service.validate(&issued.token).await.unwrap();

        assert_eq!(user.id, user_id);
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.display_name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn expiry_follows_ttl() {
        let (service, user_id) = service_with_user(30).await;
        let before = Timestamp::now();

        let issued = service.issue(&user_id).unwrap();

        let delta = issued.expires_at.as_unix_secs() - before.as_unix_secs();
        assert!((30 * 60..=30 * 60 + 1).contains(&delta));
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let (service, user_id) = service_with_user(-10).await;
        let issued = service.issue(&user_id).unwrap();

        let result = service.validate(&issued.token).await;
        assert_eq!(result.unwrap_err(), AuthError::TokenExpired);
    }

    #[tokio::test]
    async fn token_signed_with_other_secret_is_invalid() {
        let (service, user_id) = service_with_user(30).await;
        let other = JwtTokenService::new(
            &SecretString::new("another-secret-another-secret-xxxx".to_string()),
            30,
            Arc::new(InMemoryUserRepository::new()),
        );

        let issued = other.issue(&user_id).unwrap();
        let result = service.validate(&issued.token).await;
        assert_eq!(result.unwrap_err(), AuthError::InvalidToken);
    }

    #[tokio::test]
    async fn garbage_token_is_invalid() {
        let (service, _) = service_with_user(30).await;
        let result = service.validate("not.a.jwt").await;
        assert_eq!(result.unwrap_err(), AuthError::InvalidToken);
    }

    #[tokio::test]
    async fn token_for_missing_user_is_rejected() {
        let (service, _) = service_with_user(30).await;
        let ghost = UserId::new("ghost").unwrap();

        let issued = service.issue(&ghost).unwrap();
        let result = service.validate(&issued.token).await;
        assert_eq!(result.unwrap_err(), AuthError::UserNotFound);
    }
}
