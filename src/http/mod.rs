//! HTTP protocol layer module
//!
//! MIME detection, request path decoding and response builders, decoupled
//! from the file-serving logic.

pub mod mime;
pub mod path;
pub mod response;

// Re-export commonly used types
pub use mime::MimeTable;
pub use path::RequestPath;
pub use response::{
    build_404_response, build_501_response, build_file_response, build_html_response,
    build_redirect_response, build_status_response,
};
