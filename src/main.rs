//! Symptom Triage server entry point.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing_subscriber::EnvFilter;

use symptom_triage::adapters::ai::{
    MockAIProvider, OllamaConfig, OllamaProvider, OpenAIConfig, OpenAIProvider,
};
use symptom_triage::adapters::auth::{Argon2PasswordHasher, JwtTokenService};
use symptom_triage::adapters::http::{
    app_router, AppState, AuthHandlers, AuthState, ChatHandlers, CookieSettings, HttpSettings,
};
use symptom_triage::adapters::memory::{InMemoryChatRepository, InMemoryUserRepository};
use symptom_triage::adapters::postgres::{PostgresChatRepository, PostgresUserRepository};
use symptom_triage::application::handlers::auth::{LoginHandler, SignupHandler};
use symptom_triage::application::handlers::chat::{
    EndChatHandler, ListChatsHandler, SendMessageHandler, StartChatHandler,
};
use symptom_triage::application::DiagnosisGenerator;
use symptom_triage::config::{AiConfig, AiProvider, AppConfig};
use symptom_triage::domain::intake::QuestionSequencer;
use symptom_triage::ports::{self, ChatRepository, UserRepository};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let (chats, users) = build_stores(&config).await?;
    let provider = build_provider(&config.ai)?;
    let info = provider.provider_info();
    tracing::info!(provider = %info.name, model = %info.model, "Completion provider ready");

    let questions = Arc::new(config.intake.load_questions()?);
    tracing::info!(questions = questions.len(), "Question list loaded");

    let tokens = Arc::new(JwtTokenService::new(
        &config.auth.jwt_secret,
        config.auth.token_ttl_minutes,
        users.clone(),
    ));
    let hasher = Arc::new(Argon2PasswordHasher::new());

    let settings = HttpSettings {
        cors_origins: config.server.cors_origins_list(),
        request_timeout: config.server.request_timeout(),
    };

    let mut diagnosis =
        DiagnosisGenerator::new(provider).with_deadline(settings.diagnosis_deadline());
    if let Some(temperature) = config.ai.temperature {
        diagnosis = diagnosis.with_temperature(temperature);
    }
    if let Some(max_tokens) = config.ai.max_tokens {
        diagnosis = diagnosis.with_max_tokens(max_tokens);
    }

    let state = AppState {
        auth: AuthHandlers::new(
            Arc::new(SignupHandler::new(users.clone(), hasher.clone(), tokens.clone())),
            Arc::new(LoginHandler::new(users.clone(), hasher, tokens.clone())),
            CookieSettings {
                name: config.auth.cookie_name.clone(),
                secure: config.auth.cookie_secure,
            },
        ),
        chat: ChatHandlers::new(
            Arc::new(StartChatHandler::new(chats.clone())),
            Arc::new(SendMessageHandler::new(
                chats.clone(),
                QuestionSequencer::new(questions),
                diagnosis,
            )),
            Arc::new(EndChatHandler::new(chats.clone(), users.clone())),
            Arc::new(ListChatsHandler::new(chats, users)),
        ),
        sessions: AuthState::new(tokens, config.auth.cookie_name.as_str()),
    };

    let app = app_router(state, &settings);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, environment = ?config.server.environment, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).pretty().init();
    }
}

async fn build_stores(
    config: &AppConfig,
) -> Result<(Arc<dyn ChatRepository>, Arc<dyn UserRepository>), BoxError> {
    let Some(database) = &config.database else {
        tracing::warn!("No database configured; chats and accounts are kept in memory");
        return Ok((
            Arc::new(InMemoryChatRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
        ));
    };

    let pool = database.pool_options().connect(&database.url).await?;
    if database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    Ok((
        Arc::new(PostgresChatRepository::new(pool.clone())),
        Arc::new(PostgresUserRepository::new(pool)),
    ))
}

fn build_provider(ai: &AiConfig) -> Result<Arc<dyn ports::AIProvider>, BoxError> {
    let provider: Arc<dyn ports::AIProvider> = match ai.provider {
        AiProvider::Ollama => {
            let mut cfg = OllamaConfig::new()
                .with_timeout(ai.timeout())
                .with_max_retries(ai.max_retries);
            if let Some(url) = &ai.base_url {
                cfg = cfg.with_base_url(url);
            }
            if let Some(model) = &ai.model {
                cfg = cfg.with_model(model);
            }
            Arc::new(OllamaProvider::new(cfg)?)
        }
        AiProvider::OpenAI => {
            let key = ai
                .api_key
                .as_ref()
                .map(|k| k.expose_secret().clone())
                .unwrap_or_default();
            let mut cfg = OpenAIConfig::new(key)
                .with_timeout(ai.timeout())
                .with_max_retries(ai.max_retries);
            if let Some(url) = &ai.base_url {
                cfg = cfg.with_base_url(url);
            }
            if let Some(model) = &ai.model {
                cfg = cfg.with_model(model);
            }
            Arc::new(OpenAIProvider::new(cfg)?)
        }
        AiProvider::Mock => Arc::new(MockAIProvider::new()),
    };
    Ok(provider)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
