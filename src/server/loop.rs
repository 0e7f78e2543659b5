// Server loop module
// Accepts connections until the shutdown future resolves

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use super::connection::handle_connection;
use crate::config::AppState;
use crate::logger;

/// Pause after a failed accept (e.g. EMFILE) before trying again
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Accept loop: listening -> handling -> listening
///
/// Each connection is served in its own task. Accept errors are logged and
/// the loop keeps going. Returns once `shutdown` completes; connections still
/// in flight are left to finish on the runtime.
pub async fn start_server_loop<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        handle_connection(stream, peer_addr, Arc::clone(&state));
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                        tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                    }
                }
            }

            () = &mut shutdown => {
                logger::log_info("Shutdown requested, no longer accepting connections");
                break;
            }
        }
    }
}
