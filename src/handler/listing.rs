//! Directory listing module
//!
//! Renders the HTML index shown for directories without an index file.

use std::io;
use std::path::Path;
use tokio::fs;

use crate::http::path::percent_encode;

/// One row of the listing
#[derive(Debug, Clone, PartialEq, Eq)]
struct ListingEntry {
    name: String,
    display: String,
    href: String,
}

/// Render the listing for `dir`, titled with the decoded request path
pub async fn render_listing(dir: &Path, request_path: &str) -> io::Result<String> {
    let mut entries = read_entries(dir).await?;
    entries.sort_by_cached_key(|e| e.name.to_lowercase());

    let title = format!("Directory listing for {}", html_escape(request_path));
    let mut html = String::with_capacity(256 + entries.len() * 64);
    html.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{title}</title>\n</head>\n<body>\n"));
    html.push_str(&format!("<h1>{title}</h1>\n<hr>\n<ul>\n"));
    for entry in &entries {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            entry.href,
            html_escape(&entry.display)
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    Ok(html)
}

async fn read_entries(dir: &Path) -> io::Result<Vec<ListingEntry>> {
    let mut reader = fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    while let Some(entry) = reader.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        // Symlinks are listed by what they point to
        let is_dir = fs::metadata(entry.path())
            .await
            .is_ok_and(|m| m.is_dir());
        let is_symlink = entry.file_type().await.is_ok_and(|t| t.is_symlink());

        let mut display = name.clone();
        let mut link = name.clone();
        if is_dir {
            display.push('/');
            link.push('/');
        }
        if is_symlink {
            display = format!("{}@", display.trim_end_matches('/'));
        }

        entries.push(ListingEntry {
            name,
            display,
            href: percent_encode(&link),
        });
    }

    Ok(entries)
}

/// Escape text for HTML element content and attribute values
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
