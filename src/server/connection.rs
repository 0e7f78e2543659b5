// Connection handling module
// Serves one accepted TCP connection in its own task

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Handle a single connection in a spawned task.
///
/// The task wraps the stream in `TokioIo`, serves HTTP/1.1 (keep-alive per
/// configuration) with the request handler, and logs connection-level errors.
/// Nothing that happens on this connection reaches the accept loop.
pub fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(state.config.server.keep_alive);

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| handler::handle_request(req, Arc::clone(&state), peer_addr)),
        );

        if let Err(err) = conn.await {
            // Clients dropping mid-response is routine
            if !err.is_incomplete_message() && !err.is_canceled() {
                logger::log_connection_error(&err);
            }
        }
    });
}
