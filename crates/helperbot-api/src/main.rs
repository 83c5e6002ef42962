//! Helperbot API server entry point.

use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;

use helperbot_api::config::{ServerConfig, StoreBackend};
use helperbot_api::error::AppError;
use helperbot_api::state::AppState;
use helperbot_api::{build_router, telemetry};
use helperbot_core::store::ConversationStore;
use helperbot_dispatch::application::services::BotServices;
use helperbot_line::LineReplyClient;
use helperbot_line::client::DEFAULT_LINE_API_BASE_URL;
use helperbot_lookup::earthquake::DEFAULT_P2PQUAKE_BASE_URL;
use helperbot_lookup::weather::DEFAULT_JMA_BASE_URL;
use helperbot_lookup::{JmaWeatherClient, OpenAiAnswerClient, P2pQuakeClient, USER_AGENT};
use helperbot_quiz::domain::questions::QuestionBank;
use helperbot_store::{FirebaseConversationStore, InMemoryConversationStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = ServerConfig::from_env()?;
    let telemetry = telemetry::init(config.otlp_endpoint.as_deref())?;

    tracing::info!(
        otlp = telemetry.exports_spans(),
        "Starting Helperbot API server"
    );

    let result = run(config).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "server stopped with an error");
    }
    telemetry.shutdown();
    result.map_err(Into::into)
}

async fn run(config: ServerConfig) -> Result<(), AppError> {
    let client = reqwest::Client::builder()
        .timeout(config.http_timeout)
        .user_agent(USER_AGENT)
        .build()?;

    let store: Arc<dyn ConversationStore> = match &config.store {
        StoreBackend::Firebase { database_url, auth } => Arc::new(
            FirebaseConversationStore::new(client.clone(), database_url, auth.clone()),
        ),
        StoreBackend::Memory => {
            tracing::warn!("using in-memory store; conversation state is lost on restart");
            Arc::new(InMemoryConversationStore::new())
        }
    };

    let replies = Arc::new(LineReplyClient::new(
        client.clone(),
        DEFAULT_LINE_API_BASE_URL,
        config.channel_access_token.clone(),
    ));
    let weather = Arc::new(JmaWeatherClient::new(client.clone(), DEFAULT_JMA_BASE_URL));
    let earthquakes = Arc::new(P2pQuakeClient::new(client.clone(), DEFAULT_P2PQUAKE_BASE_URL));

    let mut services = BotServices::new(store, replies, weather, earthquakes)
        .with_debug_commands(config.debug_commands);
    if let Some(path) = &config.quiz_bank_path {
        let source = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::Config(format!("cannot read QUIZ_BANK_PATH {}: {e}", path.display()))
        })?;
        let bank = QuestionBank::from_yaml(&source)
            .map_err(|e| AppError::Config(format!("invalid question bank: {e}")))?;
        tracing::info!(questions = bank.len(), "loaded question bank");
        services = services.with_questions(bank);
    }
    if let Some(ai) = &config.ai {
        services = services.with_answers(Arc::new(OpenAiAnswerClient::new(
            client.clone(),
            &ai.base_url,
            ai.api_key.clone(),
            ai.model.clone(),
        )));
    }

    let app = build_router(AppState::new(services, &config.channel_secret));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
