//! Request path decoding
//!
//! Turns the path component of a request URI into safe relative segments
//! and percent-encodes names for links in generated HTML.

use crate::error::ServeError;

/// Decoded request path split into segments that are safe to join onto a root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPath {
    /// Decoded, normalized path segments; `..` never climbs above the root
    pub segments: Vec<String>,
    /// Whether the raw path ended with `/`
    pub trailing_slash: bool,
}

impl RequestPath {
    /// Parse a raw URI path (query and fragment are discarded)
    ///
    /// # Examples
    /// ```
    /// use wasm_serve::http::path::RequestPath;
    ///
    /// let path = RequestPath::parse("/pkg/../pkg/app%20bg.wasm?v=2").unwrap();
    /// assert_eq!(path.segments, vec!["pkg", "app bg.wasm"]);
    /// assert!(!path.trailing_slash);
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ServeError> {
        let path = raw.split(['?', '#']).next().unwrap_or_default();
        let decoded = percent_decode(path)?;
        let trailing_slash = decoded.ends_with('/');

        let mut segments = Vec::new();
        for segment in decoded.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                s if s.contains('\0') || (cfg!(windows) && s.contains('\\')) => {
                    return Err(ServeError::BadRequest(format!(
                        "illegal character in path segment '{s}'"
                    )));
                }
                s => segments.push(s.to_string()),
            }
        }

        Ok(Self {
            segments,
            trailing_slash,
        })
    }

    /// Relative filesystem path for these segments
    pub fn to_relative(&self) -> std::path::PathBuf {
        self.segments.iter().collect()
    }
}

/// Decode `%XX` escapes, rejecting malformed escapes and non-UTF-8 results
pub fn percent_decode(input: &str) -> Result<String, ServeError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .and_then(|h| std::str::from_utf8(h).ok())
                .and_then(|h| u8::from_str_radix(h, 16).ok());
            let Some(byte) = hex else {
                return Err(ServeError::BadRequest(format!(
                    "malformed percent-escape in '{input}'"
                )));
            };
            out.push(byte);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }

    String::from_utf8(out)
        .map_err(|_| ServeError::BadRequest(format!("path is not valid UTF-8: '{input}'")))
}

/// Percent-encode a name for use in an href
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' | b'/' => {
                out.push(char::from(byte));
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
