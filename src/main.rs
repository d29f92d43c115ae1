// src/main.rs

use std::net::SocketAddr;
use std::sync::Arc;

use bingo_backend::config::Config;
use bingo_backend::routes;
use bingo_backend::state::AppState;
use bingo_backend::store::{DocumentStore, MemoryDocumentStore, PgDocumentStore};
use dotenvy::dotenv;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // Document store: Postgres when configured, otherwise in memory
    let store: Arc<dyn DocumentStore> = match &config.database_url {
        Some(url) => match PgDocumentStore::connect(url).await {
            Ok(store) => Arc::new(store),
            Err(e) => panic!("Failed to connect to database after retries: {}", e),
        },
        None => {
            tracing::warn!("DATABASE_URL not set, documents are kept in memory only");
            Arc::new(MemoryDocumentStore::new())
        }
    };

    tracing::info!(
        "Reveal date: {}, admin key {}",
        config.reveal_date,
        if config.admin_key.is_some() { "required" } else { "not configured" }
    );

    let port = config.port;
    let state = AppState::new(store, config);

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listening address");

    // Start the server
    axum::serve(listener, app).await.expect("Server error");
}
