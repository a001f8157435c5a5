//! Intake engine
//!
//! Form-intake and analytics backend:
//! - lead/contact/investor submission with sanitization at the boundary
//! - durable flat-file JSON store with serialized concurrent access
//! - admin listing and CSV export
//! - page-view and event analytics in one mutable document

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};

use api::middleware::rate_limit::RateLimitConfig;
use api::{router, AppState};
use store::{FileStore, RecordStore};
use telemetry::{health, init_tracing_from_env};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    /// Directory holding the collection files and analytics document
    #[serde(default = "default_data_dir")]
    data_dir: String,

    /// Token gating the admin endpoints; unset disables them
    #[serde(default)]
    admin_token: Option<String>,

    /// Public-endpoint rate limit, requests per second per client IP
    #[serde(default = "default_rate")]
    rate: u32,
    #[serde(default = "default_burst")]
    burst: u32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_rate() -> u32 {
    2
}

fn default_burst() -> u32 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: default_data_dir(),
            admin_token: None,
            rate: default_rate(),
            burst: default_burst(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing_from_env();

    info!("Starting intake engine v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config()?;

    if config.admin_token.is_none() {
        info!("No admin token configured; admin endpoints are disabled");
    }

    // Open the store, initializing missing collection files
    let file_store = match FileStore::open(&config.data_dir).await {
        Ok(store) => {
            health().store.set_healthy();
            info!(data_dir = %config.data_dir, "Record store: ready");
            store
        }
        Err(e) => {
            health().store.set_unhealthy(e.to_string());
            error!(data_dir = %config.data_dir, error = %e, "Record store: failed to open");
            return Err(e).context("Failed to open record store");
        }
    };
    let record_store: Arc<dyn RecordStore> = Arc::new(file_store);

    // Create application state
    let state = AppState::with_rate_limit(
        record_store,
        config.admin_token.clone(),
        RateLimitConfig {
            rate: config.rate,
            burst: config.burst,
        },
    );

    // Start rate limiter cleanup background task
    let _rate_limiter_cleanup = state.start_rate_limiter_cleanup();
    info!("Started rate limiter cleanup task (every 5 minutes)");

    // Create router
    let app = router(state);

    // Start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("INTAKE")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Direct env overrides for the fields operators actually set
    if let Ok(data_dir) = std::env::var("INTAKE_DATA_DIR") {
        config.data_dir = data_dir;
    }
    if let Ok(token) = std::env::var("INTAKE_ADMIN_TOKEN") {
        config.admin_token = Some(token);
    }

    Ok(config)
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
