//! mcat-ui - music library server
//!
//! Serves the catalog written by mcat-ix: song listing and CRUD, audio
//! streaming, thumbnails, and a minimal library page.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mcat_common::config::{self, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT};
use mcat_ui::AppState;

/// Command-line arguments for mcat-ui
#[derive(Parser, Debug)]
#[command(name = "mcat-ui")]
#[command(about = "Music library server for MCAT")]
#[command(version)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "MCAT_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "MCAT_PORT")]
    port: Option<u16>,

    /// Catalog database path
    #[arg(long, env = "MCAT_DATABASE_PATH")]
    database_path: Option<PathBuf>,

    /// Thumbnail directory to serve under /thumbs
    #[arg(long, env = "MCAT_THUMBNAIL_DIR")]
    thumbnail_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mcat_ui=info,mcat_common=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let toml_config = config::load_toml_config();

    let host = args
        .host
        .or_else(|| toml_config.server.host.clone())
        .unwrap_or_else(|| DEFAULT_SERVER_HOST.to_string());
    let port = args
        .port
        .or(toml_config.server.port)
        .unwrap_or(DEFAULT_SERVER_PORT);

    let database_path = config::resolve_database_path(args.database_path, &toml_config);
    let thumbnail_dir = config::resolve_thumbnail_dir(args.thumbnail_dir, &toml_config);

    info!("Starting mcat-ui (Music Library Server)");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Database: {}", database_path.display());
    info!("Thumbnails: {}", thumbnail_dir.display());

    let pool = mcat_common::db::init_database(&database_path)
        .await
        .context("Failed to open catalog database")?;

    let state = AppState::new(pool, thumbnail_dir);
    let app = mcat_ui::build_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .context("Invalid listen address")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
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
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
