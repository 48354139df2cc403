//! Log Triage server binary.
//!
//! Bootstraps configuration, tracing, adapter wiring, and the axum server.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use log_triage::adapters::{
    analysis_routes, AnalysisAppState, CachedConfigurationSource, FileConfigurationSource,
    InMemoryLogStore, OpenAiChatConfig, OpenAiChatModel, TracingAuditSink,
};
use log_triage::application::{AnalysisOrchestrator, LlmClassifier};
use log_triage::config::AppConfig;
use log_triage::ports::{AuditSink, ChatModel, ConfigurationSource, LogStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    config.validate()?;

    let chat_model = OpenAiChatModel::new(
        OpenAiChatConfig::new(
            config.llm.endpoint.clone(),
            config.llm.deployment.clone(),
            config.llm.api_key.clone(),
        )
        .with_api_version(config.llm.api_version.clone())
        .with_timeout(config.llm.timeout()),
    )?;
    let chat_model: Arc<dyn ChatModel> = Arc::new(chat_model);

    let log_store = Arc::new(InMemoryLogStore::new());
    log_store.register_application("AppSalud").await;
    log_store.register_application("LinaChatbot").await;
    let log_store: Arc<dyn LogStore> = log_store;

    let configuration_source: Arc<dyn ConfigurationSource> =
        Arc::new(CachedConfigurationSource::new(Arc::new(
            FileConfigurationSource::new(config.analysis.configuration_file.clone()),
        )));

    let audit_sink: Arc<dyn AuditSink> = Arc::new(TracingAuditSink::new());

    let orchestrator = Arc::new(AnalysisOrchestrator::new(
        log_store.clone(),
        Arc::new(LlmClassifier::new(chat_model)),
        configuration_source,
        audit_sink,
    ));

    let state = AnalysisAppState {
        orchestrator,
        log_store,
    };

    let cors = if config.server.cors_origins_list().is_empty() {
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .server
            .cors_origins_list()
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let app = analysis_routes(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.server.request_timeout_secs,
            )))
            .layer(cors),
    );

    let addr = config.server.socket_addr()?;
    info!(%addr, environment = ?config.server.environment, "starting log-triage server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
