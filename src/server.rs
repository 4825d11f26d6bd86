//! HTTP server initialization and runtime setup.
//!
//! Connects the Link Store, builds the runtime snapshot, and drives the Axum
//! server until a shutdown signal arrives.

use crate::config::Config;
use crate::infrastructure::persistence;
use crate::routes::app_router;
use crate::runtime::{Runtime, RuntimeHandle};
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Link Store (PostgreSQL pool + migrations, or in-memory)
/// - Runtime snapshot (link service, not-found page)
/// - Axum HTTP server with graceful shutdown
///
/// `config_path` is re-read on every reload.
///
/// # Errors
///
/// Returns an error if:
/// - Store connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config, config_path: PathBuf) -> Result<()> {
    let repository = persistence::connect(&config).await?;
    let runtime = Runtime::from_config(&config, repository).await?;
    let state = AppState::new(Arc::new(RuntimeHandle::new(runtime, config_path)));

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
