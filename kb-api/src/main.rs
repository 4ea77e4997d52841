//! kb-api - Knowledge base REST API service
//!
//! Serves categorized troubleshooting articles with public browsing,
//! IP-keyed 1-5 star ratings, and token-authenticated admin CRUD.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use kb_api::{build_router, AppState};
use kb_common::db::init_database;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for kb-api
#[derive(Parser, Debug)]
#[command(name = "kb-api")]
#[command(about = "Knowledge base REST API service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "5000", env = "KB_PORT")]
    port: u16,

    /// Path to the SQLite database file
    #[arg(short, long, default_value = "kb.db", env = "KB_DATABASE")]
    database: PathBuf,

    /// Secret used to sign admin session tokens
    #[arg(long, env = "KB_JWT_SECRET")]
    jwt_secret: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kb_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!(
        "Starting knowledge base API v{} on port {}",
        env!("CARGO_PKG_VERSION"),
        args.port
    );
    info!("Database path: {}", args.database.display());

    let pool = init_database(&args.database)
        .await
        .context("Failed to initialize database")?;

    let state = AppState::new(pool, args.jwt_secret);
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    // ConnectInfo supplies the peer address used for submitter identity
    // when no forwarded-for header is present
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
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
