use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use task_board::{
    args::Args,
    config::Config,
    db_persistence::DbPersistence,
    errors::{AppError, AppResult},
    http_server,
};

#[tokio::main]
async fn main() -> AppResult<()> {
    let args = Args::parse();

    // Load configuration from --config path (defaults to config/default.toml)
    let mut config = Config::load(&args.config)?;

    // Apply CLI overrides
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(database_url) = args.database_url {
        config.data.database_url = database_url;
    }

    // Initialize logging
    init_logging(&config.logging.level)?;

    info!("Starting TaskBoard v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration loaded from: {}", args.config);

    // Initialize database persistence
    let db_url = config.get_database_url();
    let db = Arc::new(DbPersistence::new(db_url).await?);

    let initial_task_count = db.tasks.task_count().await?;
    info!("Loaded {} existing tasks from database", initial_task_count);

    // Start HTTP server
    let server_address = config.get_server_address();
    info!("HTTP API available at: http://{}", server_address);

    http_server::start_server(db, &server_address)
        .await
        .map_err(|e| AppError::Server(e.to_string()))?;

    Ok(())
}

fn init_logging(level: &str) -> AppResult<()> {
    let log_level = match level.to_lowercase().as_str() {
        "error" => tracing::Level::ERROR,
        "warn" => tracing::Level::WARN,
        "info" => tracing::Level::INFO,
        "debug" => tracing::Level::DEBUG,
        "trace" => tracing::Level::TRACE,
        _ => {
            eprintln!("Invalid log level: {}, defaulting to info", level);
            tracing::Level::INFO
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("task_board={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    Ok(())
}
