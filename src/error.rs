//! Error taxonomy
//!
//! Startup failures (`Bind`) are fatal; every other variant is scoped to a
//! single request and maps to an HTTP status.

use std::fmt;
use std::io;
use std::net::SocketAddr;

pub enum ServeError {
    /// Listening socket could not be created or bound
    Bind { addr: SocketAddr, source: io::Error },
    /// Requested resource does not exist
    NotFound,
    /// Requested path escapes the served root
    Forbidden,
    /// Request path could not be decoded
    BadRequest(String),
    /// Filesystem error while reading an existing resource
    Io(io::Error),
}

impl ServeError {
    /// HTTP status code reported to the client for per-request errors
    pub const fn status(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::Forbidden => 403,
            Self::BadRequest(_) => 400,
            Self::Bind { .. } | Self::Io(_) => 500,
        }
    }
}

impl fmt::Display for ServeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind { addr, source } => write!(f, "failed to bind {addr}: {source}"),
            Self::NotFound => f.write_str("file not found"),
            Self::Forbidden => f.write_str("path escapes the served root"),
            Self::BadRequest(reason) => write!(f, "bad request: {reason}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

// `main` prints errors with `{:?}`, so Debug reads the same as Display
impl fmt::Debug for ServeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl std::error::Error for ServeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bind { source, .. } => Some(source),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ServeError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            _ => Self::Io(e),
        }
    }
}
