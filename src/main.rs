// src/main.rs

use std::net::SocketAddr;

use cert_quiz::config::Config;
use cert_quiz::routes;
use cert_quiz::state::AppState;
use cert_quiz::store::QuestionStore;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration from environment (.env included)
    let config = Config::from_env()?;

    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "app.log");
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

    // Load and validate the question bank once
    let questions = QuestionStore::load(&config.questions_path).map_err(|e| {
        tracing::error!("Failed to load question bank: {}", e);
        e
    })?;

    let addr: SocketAddr = config.server_address.parse()?;
    tracing::info!("History ledger keeps the last {} attempts", config.history_capacity);

    // Create AppState
    let state = AppState::new(questions, config);

    // Create the Axum application router
    let app = routes::create_router(state);

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Start the server
    axum::serve(listener, app).await?;
    Ok(())
}
