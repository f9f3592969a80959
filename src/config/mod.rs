//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables use the `SYMPTOM_TRIAGE` prefix
//! and `__` between nested keys.
//!
//! # Example
//!
//! ```no_run
//! use symptom_triage::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod ai;
mod auth;
mod database;
mod error;
mod intake;
mod server;

pub use ai::{AiConfig, AiProvider};
pub use auth::{AuthConfig, MIN_PRODUCTION_SECRET_BYTES};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use intake::IntakeConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL; in-memory stores are used when absent
    pub database: Option<DatabaseConfig>,

    /// Token and cookie settings
    #[serde(default)]
    pub auth: AuthConfig,

    /// Completion provider
    #[serde(default)]
    pub ai: AiConfig,

    /// Question list source
    #[serde(default)]
    pub intake: IntakeConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// - `SYMPTOM_TRIAGE__SERVER__PORT=8000` -> `server.port = 8000`
    /// - `SYMPTOM_TRIAGE__DATABASE__URL=...` -> `database.url = ...`
    /// - `SYMPTOM_TRIAGE__AI__PROVIDER=openai` -> `ai.provider = OpenAI`
    ///
    /// A `.env` file is read first when present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SYMPTOM_TRIAGE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.auth.validate(&self.server.environment)?;
        self.ai.validate(&self.server.environment)?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
