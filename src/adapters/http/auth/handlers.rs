//! HTTP handlers for account endpoints.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Response, response::IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::adapters::http::error::{error_response, ErrorResponse};
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::auth::{LoginCommand, LoginHandler, SignupCommand, SignupHandler};
use crate::domain::account::AccountError;
use crate::ports::IssuedToken;

use super::dto::{AuthCheckResponse, LoginRequest, MessageResponse, SignupRequest};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

/// Session cookie attributes.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    pub secure: bool,
}

impl CookieSettings {
    fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build((self.name.clone(), token))
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .path("/")
            .build()
    }

    fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build((self.name.clone(), "")).path("/").build()
    }
}

#[derive(Clone)]
pub struct AuthHandlers {
    signup_handler: Arc<SignupHandler>,
    login_handler: Arc<LoginHandler>,
    cookie: CookieSettings,
}

impl AuthHandlers {
    pub fn new(
        signup_handler: Arc<SignupHandler>,
        login_handler: Arc<LoginHandler>,
        cookie: CookieSettings,
    ) -> Self {
        Self {
            signup_handler,
            login_handler,
            cookie,
        }
    }

    fn signed_in(&self, jar: CookieJar, token: IssuedToken, message: &str) -> Response {
        let jar = jar.add(self.cookie.session_cookie(token.token));
        (jar, Json(MessageResponse::new(message))).into_response()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /signup - Create an account and set the session cookie
pub async fn signup(
    State(handlers): State<AuthHandlers>,
    jar: CookieJar,
    Json(req): Json<SignupRequest>,
) -> Response {
    let cmd = SignupCommand {
        name: req.name,
        email: req.email,
        password: req.password,
    };

    match handlers.signup_handler.handle(cmd).await {
        Ok(token) => handlers.signed_in(jar, token, "Signup successful"),
        Err(e) => handle_account_error(e),
    }
}

/// POST /login - Exchange credentials for the session cookie
pub async fn login(
    State(handlers): State<AuthHandlers>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Response {
    let cmd = LoginCommand {
        email: req.email,
        password: req.password,
    };

    match handlers.login_handler.handle(cmd).await {
        Ok(token) => handlers.signed_in(jar, token, "Login successful"),
        Err(e) => handle_account_error(e),
    }
}

/// GET /logout - Remove the session cookie
pub async fn logout(State(handlers): State<AuthHandlers>, jar: CookieJar) -> Response {
    let jar = jar.remove(handlers.cookie.removal_cookie());
    (jar, Json(MessageResponse::new("Logged out"))).into_response()
}

/// GET /auth/check - Report the authenticated user
pub async fn auth_check(RequireAuth(user): RequireAuth) -> Json<AuthCheckResponse> {
    Json(AuthCheckResponse {
        message: "Authenticated".to_string(),
        user_id: user.id.to_string(),
    })
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn handle_account_error(error: AccountError) -> Response {
    match error {
        AccountError::EmailTaken | AccountError::InvalidCredentials => error_response(
            StatusCode::BAD_REQUEST,
            ErrorResponse::bad_request(error.to_string()),
        ),
        AccountError::Validation(e) => error_response(
            StatusCode::BAD_REQUEST,
            ErrorResponse::bad_request(e.to_string()),
        ),
        AccountError::Infrastructure(msg) => {
            tracing::error!(error = %msg, "Account operation failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::internal("Internal server error"),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ValidationError;

    #[test]
    fn credential_errors_map_to_400() {
        for error in [AccountError::EmailTaken, AccountError::InvalidCredentials] {
            assert_eq!(handle_account_error(error).status(), StatusCode::BAD_REQUEST);
        }
        let validation = AccountError::Validation(ValidationError::empty_field("name"));
        assert_eq!(handle_account_error(validation).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn infrastructure_error_maps_to_500() {
        let response = handle_account_error(AccountError::Infrastructure("db down".into()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn session_cookie_is_http_only_and_lax() {
        let settings = CookieSettings {
            name: "access_token".into(),
            secure: true,
        };
        let cookie = settings.session_cookie("tok".into());
        assert_eq!(cookie.name(), "access_token");
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
    }
}
