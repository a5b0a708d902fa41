// src/main.rs

use exam_simulator::config::Config;
use exam_simulator::routes;
use exam_simulator::services::session::SessionStore;
use exam_simulator::state::AppState;
use exam_simulator::storage::{history_repository::JsonFileHistoryStore, question_pool::QuestionPool};
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

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

    // Load the question pool once; an unreadable pool leaves the server up with no questions
    let pool = QuestionPool::load(&config.questions_path);
    if pool.is_empty() {
        tracing::warn!("Question pool is empty; exams cannot be started");
    }

    let history = JsonFileHistoryStore::new(&config.history_path);
    tracing::info!("History store at {}", history.path().display());

    // Create AppState
    let state = AppState {
        pool: Arc::new(pool),
        history: Arc::new(history),
        sessions: SessionStore::new(config.session_max_age_secs),
        config: config.clone(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    // Bind to the listening address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    // Start the server
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
    }
}
