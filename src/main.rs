use discord_build_notifier::api;
use discord_build_notifier::logging::{FileLogger, setup_logging};
use discord_build_notifier::{AppState, load_config};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8899";
const DEFAULT_CONFIG_PATH: &str = "notifier_config.toml";

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let bind_address =
        std::env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string());
    let config_path =
        std::env::var("NOTIFIER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let file_logger = std::env::var("NOTIFIER_LOG_DIR")
        .ok()
        .filter(|dir| !dir.is_empty())
        .map(|dir| FileLogger::new(PathBuf::from(dir)));

    // Held until shutdown so buffered file logs get flushed
    let _log_guard = match setup_logging(file_logger.as_ref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Logging error: {}", e);
            std::process::exit(1);
        }
    };

    let config = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Loaded {} project(s) from {:?}",
        config.project.len(),
        config_path
    );
    let state = Arc::new(AppState::new(config));
    let app = api::router(state);

    let listener = match tokio::net::TcpListener::bind(&bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", bind_address, e);
            std::process::exit(1);
        }
    };
    info!("Listening on {}", bind_address);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
