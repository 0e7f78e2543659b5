// Application state module
// Immutable state shared by every connection

use std::io;
use std::path::{Path, PathBuf};

use super::types::Config;
use crate::http::MimeTable;

/// Application state, built once at startup
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    /// Canonicalized served root
    pub root: PathBuf,
    pub mime: MimeTable,
}

impl AppState {
    /// Resolve the served root and build the MIME table
    ///
    /// Fails if the root does not exist or is not a directory.
    pub fn new(config: Config) -> io::Result<Self> {
        let root = Path::new(&config.server.root).canonicalize()?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("served root is not a directory: {}", root.display()),
            ));
        }
        let mime = MimeTable::with_overrides(&config.mime.overrides);
        Ok(Self { config, root, mime })
    }
}
