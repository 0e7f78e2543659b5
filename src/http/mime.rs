//! MIME type detection module
//!
//! Returns the Content-Type for a file based on its extension. Lookups go
//! through an override table first and fall back to the built-in
//! `mime_guess` database. The `.wasm` override is always present.

use std::collections::HashMap;
use std::path::Path;

/// Content type served for WebAssembly binaries
pub const WASM_CONTENT_TYPE: &str = "application/wasm";

/// Fallback for unknown or missing extensions
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Extension to content-type mapping, immutable once built
#[derive(Debug, Clone)]
pub struct MimeTable {
    overrides: HashMap<String, String>,
}

impl MimeTable {
    /// Built-in database plus the `.wasm` override
    pub fn new() -> Self {
        Self::with_overrides(std::iter::empty::<(String, String)>())
    }

    /// Built-in database plus extra overrides
    ///
    /// Keys may be given with or without the leading dot and in any case.
    /// A `wasm` entry in `extra` is ignored.
    ///
    /// # Examples
    /// ```
    /// use wasm_serve::http::mime::MimeTable;
    ///
    /// let table = MimeTable::with_overrides([(".WASM", "text/plain"), ("data", "text/csv")]);
    /// assert_eq!(table.lookup(Some("wasm")), "application/wasm");
    /// assert_eq!(table.lookup(Some("data")), "text/csv");
    /// ```
    pub fn with_overrides<I, K, V>(extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut overrides: HashMap<String, String> = extra
            .into_iter()
            .map(|(ext, content_type)| (normalize_extension(ext.as_ref()), content_type.into()))
            .filter(|(ext, _)| !ext.is_empty())
            .collect();
        overrides.insert("wasm".to_string(), WASM_CONTENT_TYPE.to_string());
        Self { overrides }
    }

    /// Get Content-Type for a bare extension (no leading dot)
    pub fn lookup(&self, extension: Option<&str>) -> &str {
        let Some(ext) = extension else {
            return DEFAULT_CONTENT_TYPE;
        };
        let ext = normalize_extension(ext);
        if let Some(content_type) = self.overrides.get(&ext) {
            return content_type;
        }
        mime_guess::from_ext(&ext)
            .first_raw()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
    }

    /// Get Content-Type for a file path
    pub fn content_type(&self, path: &Path) -> &str {
        self.lookup(path.extension().and_then(|e| e.to_str()))
    }

    /// Number of registered overrides, `.wasm` included
    pub fn override_count(&self) -> usize {
        self.overrides.len()
    }
}

impl Default for MimeTable {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wasm_type() {
        let table = MimeTable::new();
        assert_eq!(table.lookup(Some("wasm")), "application/wasm");
        assert_eq!(table.lookup(Some("WASM")), "application/wasm");
        assert_eq!(
            table.content_type(Path::new("pkg/module_bg.wasm")),
            "application/wasm"
        );
    }

    #[test]
    fn test_wasm_override_cannot_be_replaced() {
        let table = MimeTable::with_overrides([("wasm", "application/octet-stream")]);
        assert_eq!(table.lookup(Some("wasm")), "application/wasm");
        assert_eq!(table.override_count(), 1);
    }

    #[test]
    fn test_common_types() {
        let table = MimeTable::new();
        assert_eq!(table.lookup(Some("html")), "text/html");
        assert_eq!(table.lookup(Some("css")), "text/css");
        assert_eq!(table.lookup(Some("json")), "application/json");
        assert_eq!(table.lookup(Some("png")), "image/png");
        assert_eq!(table.lookup(Some("txt")), "text/plain");
    }

    #[test]
    fn test_builtin_matches_database() {
        let table = MimeTable::new();
        for ext in ["js", "svg", "jpg", "mp4", "woff2"] {
            assert_eq!(
                table.lookup(Some(ext)),
                mime_guess::from_ext(ext).first_raw().unwrap_or(DEFAULT_CONTENT_TYPE)
            );
        }
    }

    #[test]
    fn test_extra_overrides() {
        let table = MimeTable::with_overrides([(".md", "text/markdown"), ("", "ignored/empty")]);
        assert_eq!(table.lookup(Some("md")), "text/markdown");
        assert_eq!(table.lookup(Some("MD")), "text/markdown");
        assert_eq!(table.override_count(), 2);
    }

    #[test]
    fn test_unknown_extension() {
        let table = MimeTable::new();
        assert_eq!(table.lookup(Some("xyzunknown")), "application/octet-stream");
        assert_eq!(table.lookup(None), "application/octet-stream");
        assert_eq!(
            table.content_type(Path::new("Makefile")),
            "application/octet-stream"
        );
    }
}
