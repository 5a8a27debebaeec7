use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use courier_agent::AgentHttpClient;
use courier_api::{config::Config, router::build_router, state::AppState};
use courier_store::StoreClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config =
        Config::load().map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting Courier relay gateway");
    tracing::info!("Config loaded: {}:{}", config.server.host, config.server.port);

    // Connect the conversation store and make sure its indexes exist; the
    // upsert contract depends on the unique compound key.
    tracing::info!("Connecting to MongoDB");
    let store = StoreClient::connect(&config.mongodb_uri, &config.mongodb.database).await?;
    store.ensure_indexes().await?;
    tracing::info!("MongoDB connected");

    // Agent gateway client
    let agent = AgentHttpClient::new(
        config.agent.url.clone(),
        Duration::from_secs(config.agent.timeout_secs),
    )?;
    tracing::info!("Agent gateway: {}", config.agent.url);

    // Create application state
    let state = Arc::new(AppState::new(config.clone(), Arc::new(store), Arc::new(agent)));

    // Build router
    let app = build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.logging.format.as_str() {
        "json" => {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}
