//! Router setup with all API routes and middleware.

use std::time::Duration;

use axum::routing::get;
use axum::{middleware, Json, Router};
use http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::auth::{auth_routes, AuthHandlers};
use super::chat::{chat_routes, ChatHandlers};
use super::middleware::{auth_middleware, AuthState};

/// Everything the routers need.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthHandlers,
    pub chat: ChatHandlers,
    pub sessions: AuthState,
}

/// Cross-cutting HTTP settings.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Origins allowed to make credentialed requests.
    pub cors_origins: Vec<String>,
    /// Upper bound on one request, diagnosis included.
    pub request_timeout: Duration,
}

impl HttpSettings {
    /// Budget for one diagnosis: nine tenths of the request timeout, so a
    /// missed deadline still leaves time to store and return the apology.
    pub fn diagnosis_deadline(&self) -> Duration {
        self.request_timeout - self.request_timeout / 10
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            request_timeout: Duration::from_secs(180),
        }
    }
}

/// Builds the application router.
pub fn app_router(state: AppState, settings: &HttpSettings) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(auth_routes(state.auth))
        .merge(chat_routes(state.chat))
        .layer(middleware::from_fn_with_state(
            state.sessions,
            auth_middleware,
        ))
        // Applied innermost-first (same order as a ServiceBuilder of
        // cors -> trace -> timeout); each Router::layer call re-boxes the
        // body so CorsLayer's `ResBody: Default` bound is satisfied.
        .layer(TimeoutLayer::new(settings.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&settings.cors_origins))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Credentialed CORS for the configured origins; unparseable entries are skipped.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Skipping invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnosis_deadline_sits_below_request_timeout() {
        let settings = HttpSettings::default();
        assert_eq!(settings.diagnosis_deadline(), Duration::from_secs(162));

        let settings = HttpSettings {
            request_timeout: Duration::from_millis(500),
            ..Default::default()
        };
        assert_eq!(settings.diagnosis_deadline(), Duration::from_millis(450));
    }

    #[test]
    fn invalid_origins_are_skipped() {
        // Must not panic on a header-invalid origin
        let _ = cors_layer(&["http://localhost:5173".into(), "bad\norigin".into()]);
    }
}
