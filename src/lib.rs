//! Static file server for WebAssembly development.
//!
//! Serves a directory over HTTP/1.1 and guarantees that `.wasm` files go out
//! as `application/wasm`, which browsers require for streaming compilation.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use error::ServeError;
