//! Authentication middleware and extractors for axum.
//!
//! - `auth_middleware` - Layer that resolves the access token and injects the user into extensions
//! - `RequireAuth` - Extractor that requires authentication
//!
//! The token is read from the session cookie first, then from the
//! `Authorization` header (with or without a `Bearer ` prefix).
//!
//! ```text
//! Request → auth_middleware → injects AuthenticatedUser into extensions
//!                                      ↓
//!                              Handler → RequireAuth extractor reads from extensions
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::CookieJar;

use crate::adapters::http::error::ErrorResponse;
use crate::domain::foundation::{AuthError, AuthenticatedUser};
use crate::ports::SessionValidator;

/// Auth middleware state.
#[derive(Clone)]
pub struct AuthState {
    validator: Arc<dyn SessionValidator>,
    cookie_name: Arc<str>,
}

impl AuthState {
    pub fn new(validator: Arc<dyn SessionValidator>, cookie_name: impl Into<Arc<str>>) -> Self {
        Self {
            validator,
            cookie_name: cookie_name.into(),
        }
    }

    /// Finds the raw token, cookie first.
    fn token_from(&self, headers: &HeaderMap) -> Option<String> {
        let jar = CookieJar::from_headers(headers);
        if let Some(cookie) = jar.get(&self.cookie_name) {
            if !cookie.value().is_empty() {
                return Some(cookie.value().to_string());
            }
        }

        let header = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
        let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
        (!token.is_empty()).then(|| token.to_string())
    }
}

/// Authentication middleware.
///
/// A missing or rejected token leaves the request unauthenticated so that
/// public routes (login with a stale cookie, for one) still work;
/// `RequireAuth` turns that into a 401 on protected routes. Only an
/// unavailable validator short-circuits, with 503.
pub async fn auth_middleware(
    State(auth): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = auth.token_from(request.headers()) else {
        return next.run(request).await;
    };

    match auth.validator.validate(&token).await {
        Ok(user) => {
            request.extensions_mut().insert(user);
        }
        Err(AuthError::ServiceUnavailable(msg)) => {
            tracing::error!("Auth service unavailable: {}", msg);
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ErrorResponse::service_unavailable(
                    "Authentication service unavailable",
                )),
            )
                .into_response();
        }
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring rejected access token");
        }
    }

    next.run(request).await
}

/// Extractor that requires authentication.
///
/// Returns 401 when the middleware did not inject a user.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .map(RequireAuth)
            .ok_or(AuthRejection::Unauthenticated)
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone)]
pub enum AuthRejection {
    /// No valid authentication token was provided.
    Unauthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponse::unauthorized("Not authenticated")),
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockSessionValidator;
    use axum::extract::FromRequestParts;
    use axum::http::{header::COOKIE, HeaderValue};

    fn state(validator: MockSessionValidator) -> AuthState {
        AuthState::new(Arc::new(validator), "access_token")
    }

    fn headers(pairs: &[(axum::http::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn token_prefers_cookie_over_header() {
        let auth = state(MockSessionValidator::new());
        let map = headers(&[
            (COOKIE, "theme=dark; access_token=from-cookie"),
            (AUTHORIZATION, "Bearer from-header"),
        ]);
        assert_eq!(auth.token_from(&map).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn header_accepts_bearer_and_bare_tokens() {
        let auth = state(MockSessionValidator::new());

        let bearer = headers(&[(AUTHORIZATION, "Bearer abc")]);
        assert_eq!(auth.token_from(&bearer).as_deref(), Some("abc"));

        let bare = headers(&[(AUTHORIZATION, "abc")]);
        assert_eq!(auth.token_from(&bare).as_deref(), Some("abc"));
    }

    #[test]
    fn missing_or_empty_token_is_none() {
        let auth = state(MockSessionValidator::new());
        assert_eq!(auth.token_from(&HeaderMap::new()), None);

        let empty = headers(&[(COOKIE, "access_token="), (AUTHORIZATION, "Bearer ")]);
        assert_eq!(auth.token_from(&empty), None);
    }

    #[tokio::test]
    async fn require_auth_extracts_user_from_extensions() {
        let mut request: axum::http::Request<()> =
            axum::http::Request::builder().uri("/test").body(()).unwrap();
        request.extensions_mut().insert(AuthenticatedUser::new(
            crate::domain::foundation::UserId::new("user-123").unwrap(),
            "test@example.com",
            None,
        ));
        let (mut parts, _body) = request.into_parts();

        let RequireAuth(user) = RequireAuth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(user.id.as_str(), "user-123");
    }

    #[tokio::test]
    async fn require_auth_fails_without_user() {
        let request: axum::http::Request<()> =
            axum::http::Request::builder().uri("/test").body(()).unwrap();
        let (mut parts, _body) = request.into_parts();

        let result = RequireAuth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthRejection::Unauthenticated)));
    }

    #[test]
    fn auth_rejection_returns_401() {
        let response = AuthRejection::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
