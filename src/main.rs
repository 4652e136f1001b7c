// src/main.rs

use std::sync::Arc;

use dotenvy::dotenv;
use qcm::catalog::Catalog;
use qcm::config::Config;
use qcm::routes;
use qcm::session::{FileStore, SessionStore};
use qcm::state::AppState;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "qcm.log");
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

    // Open the catalog; migrations run on connect
    let catalog = Catalog::connect(&config.database_url, config.max_connections).await?;
    tracing::info!("Catalog ready at {}", config.database_url);

    let store = FileStore::open(&config.session_dir)?;
    tracing::info!("Sessions stored in {}", store.dir().display());
    let sessions = SessionStore::new(Arc::new(store));

    let state = AppState::new(catalog, sessions, config.clone());

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    // Start the server
    axum::serve(listener, app).await?;
    Ok(())
}
