//! HTTP server startup logic.
//!
//! One accept loop, driven by `axum_server`, spawns a task per connection. There is
//! no connection limit and no per-request timeout. The loop stops when the shared
//! [`Handle`] is told to shut down.

use std::net::SocketAddr;

use axum::Router;
use axum_server::Handle;

use crate::config::{AppConfig, ConfigError};

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid listen address: {0}")]
    Address(#[from] ConfigError),

    #[error("Failed to bind server on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Start the HTTP server from configuration, shutting down on SIGINT/SIGTERM.
///
/// This function blocks until the server shuts down.
pub async fn start_server(app: Router, config: &AppConfig) -> Result<(), ServerError> {
    let addr = config.http.socket_addr()?;
    let handle = Handle::new();

    shutdown::setup_shutdown_handler(handle.clone(), config.http.drain_timeout());

    serve(app, addr, handle).await
}

/// Bind `addr` and serve `app` until `handle` shuts the listener down.
///
/// Peer addresses are attached to every request as `ConnectInfo<SocketAddr>`.
pub async fn serve(app: Router, addr: SocketAddr, handle: Handle) -> Result<(), ServerError> {
    tokio::spawn(log_when_listening(handle.clone()));

    axum_server::bind(addr)
        .handle(handle)
        .serve(app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn log_when_listening(handle: Handle) {
    if let Some(addr) = handle.listening().await {
        tracing::info!(%addr, port = addr.port(), "Sample app running");
    }
}
