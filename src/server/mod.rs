// Server module entry point
// Listener creation, accept loop, per-connection tasks and shutdown signals

pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the module is exposed as `server_loop`
#[path = "loop.rs"]
pub mod server_loop;

pub use listener::create_listener;
pub use server_loop::start_server_loop;
pub use signal::shutdown_signal;

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use http_body_util::{BodyExt, Empty};
    use hyper::body::Bytes;
    use hyper::client::conn::http1;
    use hyper::{Method, Request, StatusCode};
    use hyper_util::rt::TokioIo;
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    use super::*;
    use crate::config::{self, AppState};

    struct Served {
        status: StatusCode,
        content_type: Option<String>,
        content_length: Option<String>,
        body: Bytes,
    }

    async fn fetch(addr: std::net::SocketAddr, method: Method, path: &str) -> Served {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (mut sender, conn) = http1::handshake(TokioIo::new(stream)).await.unwrap();
        tokio::spawn(conn);

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Host", addr.to_string())
            .body(Empty::<Bytes>::new())
            .unwrap();
        let resp = sender.send_request(req).await.unwrap();

        let header = |name: &str| {
            resp.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string)
        };
        let status = resp.status();
        let content_type = header("content-type");
        let content_length = header("content-length");
        let body = resp.into_body().collect().await.unwrap().to_bytes();

        Served {
            status,
            content_type,
            content_length,
            body,
        }
    }

    fn served_root(name: &str) -> PathBuf {
        let root = std::env::temp_dir().join(format!(
            "wasm-serve-e2e-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("module.wasm"), b"\x00asm").unwrap();
        std::fs::write(root.join("index.html"), b"<html></html>").unwrap();
        root
    }

    #[tokio::test]
    async fn test_end_to_end() {
        let root = served_root("scenario");
        let state = Arc::new(AppState::new(config::test_config(&root)).unwrap());
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(start_server_loop(listener, state, async {
            let _ = stop_rx.await;
        }));

        let wasm = fetch(addr, Method::GET, "/module.wasm").await;
        assert_eq!(wasm.status, StatusCode::OK);
        assert_eq!(wasm.content_type.as_deref(), Some("application/wasm"));
        assert_eq!(wasm.content_length.as_deref(), Some("4"));
        assert_eq!(wasm.body, Bytes::from_static(b"\x00asm"));

        let html = fetch(addr, Method::GET, "/index.html").await;
        assert_eq!(html.status, StatusCode::OK);
        assert_eq!(html.content_type.as_deref(), Some("text/html"));
        assert_eq!(html.body, Bytes::from_static(b"<html></html>"));

        let missing = fetch(addr, Method::GET, "/missing.txt").await;
        assert_eq!(missing.status, StatusCode::NOT_FOUND);

        // Still serving after a failed request
        let again = fetch(addr, Method::GET, "/").await;
        assert_eq!(again.status, StatusCode::OK);
        assert_eq!(again.body, Bytes::from_static(b"<html></html>"));

        let head = fetch(addr, Method::HEAD, "/module.wasm").await;
        assert_eq!(head.status, StatusCode::OK);
        assert_eq!(head.content_length.as_deref(), Some("4"));
        assert!(head.body.is_empty());

        let post = fetch(addr, Method::POST, "/module.wasm").await;
        assert_eq!(post.status, StatusCode::NOT_IMPLEMENTED);

        stop_tx.send(()).unwrap();
        server.await.unwrap();
        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_concurrent_clients() {
        let root = served_root("concurrent");
        let state = Arc::new(AppState::new(config::test_config(&root)).unwrap());
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(start_server_loop(listener, state, std::future::pending()));

        // An idle connection must not hold up others
        let _idle = TcpStream::connect(addr).await.unwrap();

        let fetches: Vec<_> = (0..8)
            .map(|_| tokio::spawn(fetch(addr, Method::GET, "/module.wasm")))
            .collect();
        for handle in fetches {
            let served = handle.await.unwrap();
            assert_eq!(served.status, StatusCode::OK);
            assert_eq!(served.body, Bytes::from_static(b"\x00asm"));
        }

        server.abort();
        let _ = std::fs::remove_dir_all(&root);
    }
}
