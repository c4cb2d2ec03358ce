use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use helpdesk_api::{config::Config, routes, state::AppState};
use helpdesk_llm::{ChatClient, ChatOptions, OpenAIClient, SupportAgent};
use helpdesk_persist::PersistClientBuilder;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting helpdesk API server");

    // Initialize completion client
    info!(base_url = %config.llm.base_url, model = %config.llm.model, "Initializing LLM client");
    let llm_client: Arc<dyn ChatClient> = Arc::new(OpenAIClient::with_base_url(
        config.llm_api_key.clone(),
        config.llm.base_url.clone(),
    )?);
    let agent = SupportAgent::new(
        llm_client,
        config.llm.model.clone(),
        ChatOptions::new()
            .temperature(config.llm.temperature)
            .max_tokens(config.llm.max_tokens),
    );

    // Initialize conversation store
    info!("Connecting to database");
    let persist = PersistClientBuilder::new()
        .database_url(config.database_url.clone())
        .max_connections(config.database.max_connections)
        .build()
        .await?;
    info!("Database connected");

    info!(
        window_secs = config.rate_limit.window_secs,
        max_requests = config.rate_limit.max_requests,
        "Rate limiting enabled"
    );
    let state = Arc::new(AppState::new(config.clone(), persist, agent));

    let app = routes::build(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Server listening on {}", addr);
    info!("Chat endpoint: http://{}/api/chat", addr);
    info!("API docs: http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Helpdesk API server stopped");
    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry.with(tracing_subscriber::fmt::layer().json()).init();
        }
        _ => {
            registry.with(tracing_subscriber::fmt::layer().pretty()).init();
        }
    }
}

/// Resolves when SIGINT (Ctrl-C) or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install CTRL+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => warn!(error = %e, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("Shutdown signal received; starting graceful shutdown");
}
