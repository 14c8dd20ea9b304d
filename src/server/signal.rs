// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use std::sync::Arc;

use crate::logger::Logger;

/// Resolve once a shutdown signal arrives (Unix: SIGTERM or SIGINT)
///
/// If the handlers cannot be registered the error is logged and the
/// future never resolves, so the server keeps running.
#[cfg(unix)]
pub async fn shutdown_signal(logger: Arc<dyn Logger>) {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut sigterm, mut sigint) = match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(term), Ok(int)) => (term, int),
        (Err(e), _) | (_, Err(e)) => {
            logger.error(&format!("Failed to register signal handlers: {e}"));
            return std::future::pending().await;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => logger.info("[SIGNAL] SIGTERM received, initiating graceful shutdown"),
        _ = sigint.recv() => logger.info("[SIGNAL] SIGINT received (Ctrl+C), initiating graceful shutdown"),
    }
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub async fn shutdown_signal(logger: Arc<dyn Logger>) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => logger.info("[SIGNAL] Ctrl+C received, initiating graceful shutdown"),
        Err(e) => {
            logger.error(&format!("Failed to listen for Ctrl+C: {e}"));
            std::future::pending::<()>().await;
        }
    }
}
