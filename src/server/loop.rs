// Server loop module
// Accepts connections until the shutdown future resolves, then drains them

use hyper_util::server::graceful::GracefulShutdown;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Run the accept loop
///
/// Each accepted connection is served on its own task. When `shutdown`
/// resolves the listener is dropped and the loop waits for connections in
/// flight to finish their current request, bounded by the connection
/// timeout. Idle keep-alive connections are closed right away.
pub async fn start_server_loop<S>(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
    shutdown: S,
) where
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let graceful = GracefulShutdown::new();

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                            &graceful,
                        );
                    }
                    Err(e) => {
                        state.logger.error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown => {
                logger::log_shutdown(
                    state.logger.as_ref(),
                    active_connections.load(Ordering::SeqCst),
                );
                break;
            }
        }
    }

    drop(listener);
    drain_connections(graceful, &state, &active_connections).await;
}

async fn drain_connections(graceful: GracefulShutdown, state: &AppState, active: &AtomicUsize) {
    match state.config.performance.connection_timeout() {
        Some(limit) => {
            tokio::select! {
                () = graceful.shutdown() => {
                    state.logger.info("All connections drained");
                }
                () = tokio::time::sleep(limit) => {
                    state.logger.warn(&format!(
                        "Drain timed out after {} seconds with {} connections still active",
                        limit.as_secs(),
                        active.load(Ordering::SeqCst)
                    ));
                }
            }
        }
        None => {
            graceful.shutdown().await;
            state.logger.info("All connections drained");
        }
    }
}
