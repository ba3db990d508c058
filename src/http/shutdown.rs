//! Shutdown signal handling.
//!
//! SIGTERM/SIGINT stop the accept loop. Requests already in flight keep running
//! until they finish or the drain timeout passes.

use std::time::Duration;

use axum_server::Handle;

/// Setup shutdown on SIGTERM and SIGINT.
///
/// When either signal is received, the server will:
/// 1. Close the listener
/// 2. Let existing connections finish, up to `drain_timeout`
/// 3. Return from `serve`
pub fn setup_shutdown_handler(handle: Handle, drain_timeout: Duration) {
    tokio::spawn(async move {
        let reason = shutdown_signal().await;
        tracing::info!(reason, "Service stopping");
        trigger_shutdown(&handle, drain_timeout);
    });
}

/// Begin shutdown on `handle`.
pub fn trigger_shutdown(handle: &Handle, drain_timeout: Duration) {
    handle.graceful_shutdown(Some(drain_timeout));
    tracing::info!(
        drain_timeout_secs = drain_timeout.as_secs(),
        "Listener closed, waiting for in-flight requests"
    );
}

/// Resolves when the process is asked to stop. A handler that cannot be installed
/// is logged and treated as never firing.
async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => "ctrl-c",
        _ = terminate => "SIGTERM",
    }
}
