//! Immutable Health: a toggleable liveness endpoint.
//!
//! This is the application entry point. It loads configuration (file, then the
//! `HEALTH_START_STATE` environment variable), initializes tracing, builds the
//! Axum router and runs the HTTP server until SIGINT/SIGTERM.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use immutable_health::config::{AppConfig, LoggingConfig, DEFAULT_LOG_FILTER};
use immutable_health::http::start_server;
use immutable_health::{create_router, AppState};

/// Immutable Health: a toggleable liveness endpoint for health-probe testing
#[derive(Parser, Debug)]
#[command(name = "immutable-health", version, about)]
struct Args {
    /// Path to an optional configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "immutable_health=debug,axum=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

fn init_tracing(filter: &str, logging: &LoggingConfig) {
    let registry = tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(filter));

    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration before tracing so the log format can come from the file
    let config = AppConfig::resolve(args.config.as_deref())?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
    init_tracing(&log_filter, &config.logging);

    tracing::info!(
        config_file = args.config.as_deref().unwrap_or("<defaults>"),
        host = %config.http.host,
        port = config.http.port,
        start_state = %config.start_state,
        log_format = %config.logging.format,
        "Loaded configuration"
    );

    let state = AppState::new(config.clone());
    let app = create_router(state);

    start_server(app, &config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
