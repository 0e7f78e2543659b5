//! Static file serving module
//!
//! Maps request paths onto the served root, enforces containment, and builds
//! file, directory and redirect responses.

use std::io;
use std::path::{Path, PathBuf};

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use tokio::fs;

use crate::config::AppState;
use crate::error::ServeError;
use crate::handler::listing;
use crate::http::{self, RequestPath};
use crate::logger;

/// Tried in order when a directory is requested
pub const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// Outcome of mapping a request path onto the served root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Regular file inside the root
    File(PathBuf),
    /// Directory without an index file
    Listing(PathBuf),
    /// Directory requested without trailing slash
    Redirect(String),
}

/// Serve a GET/HEAD request for `uri_path`
pub async fn serve(
    state: &AppState,
    uri_path: &str,
    query: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let result = match resolve(&state.root, uri_path, query).await {
        Ok(Resolved::File(path)) => serve_file(state, &path, is_head).await,
        Ok(Resolved::Listing(dir)) => serve_listing(&dir, uri_path, is_head).await,
        Ok(Resolved::Redirect(location)) => Ok(http::build_redirect_response(&location)),
        Err(e) => Err(e),
    };

    result.unwrap_or_else(|e| {
        match &e {
            ServeError::Forbidden => {
                logger::log_warning(&format!("Path traversal attempt blocked: {uri_path}"));
            }
            ServeError::Io(_) | ServeError::Bind { .. } => {
                logger::log_error(&format!("Failed to serve '{uri_path}': {e}"));
            }
            ServeError::NotFound | ServeError::BadRequest(_) => {}
        }
        http::build_status_response(e.status())
    })
}

/// Map a request path onto the served root
///
/// `root` must already be canonical. The result never points outside it.
pub async fn resolve(
    root: &Path,
    uri_path: &str,
    query: Option<&str>,
) -> Result<Resolved, ServeError> {
    let request = RequestPath::parse(uri_path)?;
    let candidate = root.join(request.to_relative());
    let canonical = canonicalize_within(root, &candidate).await?;

    let metadata = fs::metadata(&canonical).await?;
    if metadata.is_dir() {
        if !request.trailing_slash {
            // Leading slashes collapsed so the Location is never protocol-relative
            let path = format!("/{}", uri_path.trim_start_matches('/'));
            let location = match query {
                Some(q) => format!("{path}/?{q}"),
                None => format!("{path}/"),
            };
            return Ok(Resolved::Redirect(location));
        }
        for index in INDEX_FILES {
            if let Some(found) = find_index(root, &canonical.join(index)).await {
                return Ok(Resolved::File(found));
            }
        }
        return Ok(Resolved::Listing(canonical));
    }

    // A file requested as a directory does not exist
    if request.trailing_slash || !metadata.is_file() {
        return Err(ServeError::NotFound);
    }
    Ok(Resolved::File(canonical))
}

/// Canonicalize `path` (following symlinks) and require it to stay under `root`
async fn canonicalize_within(root: &Path, path: &Path) -> Result<PathBuf, ServeError> {
    let canonical = fs::canonicalize(path).await.map_err(|e| match e.kind() {
        io::ErrorKind::PermissionDenied => ServeError::Forbidden,
        _ => ServeError::NotFound,
    })?;
    if canonical.starts_with(root) {
        Ok(canonical)
    } else {
        Err(ServeError::Forbidden)
    }
}

async fn find_index(root: &Path, candidate: &Path) -> Option<PathBuf> {
    let canonical = canonicalize_within(root, candidate).await.ok()?;
    let metadata = fs::metadata(&canonical).await.ok()?;
    metadata.is_file().then_some(canonical)
}

/// Serve a regular file with its table-derived content type
async fn serve_file(
    state: &AppState,
    path: &Path,
    is_head: bool,
) -> Result<Response<Full<Bytes>>, ServeError> {
    let content_type = state.mime.content_type(path);

    if is_head {
        let metadata = fs::metadata(path).await.map_err(ServeError::Io)?;
        return Ok(http::build_file_response(
            Bytes::new(),
            metadata.len(),
            content_type,
        ));
    }

    // Vanished between resolve and read counts as an I/O failure
    let content = fs::read(path).await.map_err(ServeError::Io)?;
    let content_length = content.len() as u64;
    Ok(http::build_file_response(
        Bytes::from(content),
        content_length,
        content_type,
    ))
}

async fn serve_listing(
    dir: &Path,
    uri_path: &str,
    is_head: bool,
) -> Result<Response<Full<Bytes>>, ServeError> {
    let display_path = http::path::percent_decode(uri_path)?;
    match listing::render_listing(dir, &display_path).await {
        Ok(html) => Ok(http::build_html_response(html, is_head)),
        Err(e) => {
            logger::log_warning(&format!(
                "No permission to list directory '{}': {e}",
                dir.display()
            ));
            Err(ServeError::NotFound)
        }
    }
}
