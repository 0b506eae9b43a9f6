//! mlib-server - Main entry point
//!
//! HTTP service storing songs and their lyrics. New songs are enriched with
//! release date, lyrics and link from the external lyrics service.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use mlib_common::config::{Config, ConfigOverrides, LogOutput, LoggingConfig};
use mlib_server::services::LyricsApiClient;
use mlib_server::{build_router, AppState};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for mlib-server
#[derive(Parser, Debug)]
#[command(name = "mlib-server")]
#[command(about = "Song and lyrics library service")]
#[command(version)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, env = "MLIB_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(long, env = "MLIB_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "MLIB_PORT")]
    port: Option<u16>,

    /// SQLite database file
    #[arg(short, long, env = "MLIB_DATABASE")]
    database: Option<PathBuf>,

    /// Base URL of the lyrics lookup service
    #[arg(long, env = "MLIB_LYRICS_API_URL")]
    lyrics_api_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "MLIB_LOG_LEVEL")]
    log_level: Option<String>,
}

impl From<Args> for ConfigOverrides {
    fn from(args: Args) -> Self {
        Self {
            config_path: args.config,
            host: args.host,
            port: args.port,
            database_path: args.database,
            lyrics_api_url: args.lyrics_api_url,
            log_level: args.log_level,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(args.into()).context("Failed to load configuration")?;

    init_tracing(&config.logging)?;

    info!(
        "Starting mlib-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &config.source {
        Some(path) => info!("Loaded configuration from {}", path.display()),
        None => warn!(
            "Config file {} not found, using built-in defaults",
            mlib_common::config::DEFAULT_CONFIG_FILE
        ),
    }
    info!("Database path: {}", config.database.path.display());
    info!("Lyrics API: {}", config.lyrics_api.base_url);

    let pool = match mlib_common::db::init_database(&config.database).await {
        Ok(pool) => {
            info!("Connected to database");
            pool
        }
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    let lyrics = LyricsApiClient::new(&config.lyrics_api)?;
    let state = AppState::new(pool.clone(), Arc::new(lyrics));
    let app = build_router(state);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await
    });

    tokio::select! {
        result = &mut server => {
            result.context("Server task failed")?.context("Server error")?;
            return Ok(());
        }
        _ = shutdown_signal() => {}
    }

    // Stop accepting; in-flight requests get a bounded grace period
    warn!("Shutting down server...");
    let _ = shutdown_tx.send(());

    let grace = config.server.shutdown_grace();
    let outcome = tokio::time::timeout(grace, &mut server).await;
    match outcome {
        Ok(result) => {
            result.context("Server task failed")?.context("Server error")?;
            info!("Server stopped gracefully");
        }
        Err(_) => {
            warn!(
                "In-flight requests still running after {}s, forcing shutdown",
                grace.as_secs()
            );
            server.abort();
        }
    }

    pool.close().await;
    Ok(())
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .with_context(|| format!("Invalid log level '{}'", logging.level))?;

    match (logging.output, &logging.file) {
        (LogOutput::File, Some(path)) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        _ => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
