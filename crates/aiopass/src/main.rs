//! AIOPass - prompt template service with token authentication

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method, header};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use aiopass_api::{AppState, create_router};
use aiopass_auth::JwtManager;
use aiopass_db::Database;
use config::{Config, CorsConfig};

/// AIOPass - prompt template service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "AIOPASS_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "AIOPASS_PORT")]
    port: Option<u16>,

    /// SQLite database path (":memory:" for a throwaway database)
    #[arg(long, env = "AIOPASS_DATABASE")]
    database: Option<String>,

    /// Token signing secret
    #[arg(long, env = "AIOPASS_JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration, then apply command line overrides
    let mut config = Config::load(&args.config)?;
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(database) = args.database {
        config.database.path = database;
    }
    if let Some(secret) = args.jwt_secret {
        config.auth.jwt_secret = Some(secret);
    }

    // Initialize logging
    init_logging(&config.logging.level, &config.logging.format);

    match &config.source {
        Some(path) => info!("Loaded configuration from {}", path),
        None => info!("Config file not found at {}, using defaults", args.config),
    }

    config.validate()?;

    info!("Starting AIOPass v{}", env!("CARGO_PKG_VERSION"));

    // Initialize database
    let db = if config.database.is_in_memory() {
        info!("Using in-memory database; data is lost on exit");
        Database::in_memory().await?
    } else {
        Database::new(&config.database.url())
            .await
            .with_context(|| format!("Failed to open database at {}", config.database.path))?
    };

    // Initialize JWT manager
    let jwt = Arc::new(JwtManager::new(
        config.jwt_secret()?,
        config.auth.token_expiry_hours,
    ));

    // Create application state
    let state = AppState::new(Arc::new(db), jwt);

    // Create router
    let mut app = create_router(state);
    if let Some(cors) = cors_layer(&config.cors)? {
        info!("CORS enabled for {:?}", config.cors.allowed_origins);
        app = app.layer(cors);
    }
    let app = app.layer(TraceLayer::new_for_http());

    // Determine bind address
    let addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.port)
        .parse()
        .context("Invalid bind address")?;

    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging
fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if format == "json" {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
}

/// Build the CORS layer, or None when no origins are configured
fn cors_layer(config: &CorsConfig) -> Result<Option<CorsLayer>> {
    if config.allowed_origins.is_empty() {
        return Ok(None);
    }

    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
    ))
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            // Without a signal handler the server runs until killed
            error!("Failed to install CTRL+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
