//! authflow reference auth service.
//!
//! Serves `POST /login` and `POST /refresh-token` for one hard-coded user.
//! Nothing here is secure; it exists so clients have something to log in to.

mod routes;

use std::io;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use authflow_core::ReferenceAuthService;

/// Port used when `PORT` is unset
const DEFAULT_PORT: u16 = 4000;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn port_from_env() -> Result<u16> {
    match std::env::var("PORT") {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("PORT must be a port number, got {:?}", raw)),
        Err(_) => Ok(DEFAULT_PORT),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let addr = SocketAddr::from(([0, 0, 0, 0], port_from_env()?));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    let app = routes::router(ReferenceAuthService::new());

    info!("Backend server running on http://localhost:{}", addr.port());
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Backend server stopped");
    Ok(())
}
