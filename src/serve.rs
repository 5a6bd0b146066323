//! Development server.
//!
//! Builds the site once, then serves the output directory with `tiny_http`:
//!
//! - Static file serving from the build output directory
//! - Automatic `index.html` resolution for directories
//! - Directory listing for directories without an index
//! - Graceful shutdown on Ctrl+C
//!
//! There is no watcher: restart the server to pick up source changes.

use crate::{build::build_site, config::DocsConfig, log};
use anyhow::{Context, Result, anyhow};
use std::{
    fs,
    io::Cursor,
    net::{IpAddr, SocketAddr},
    path::{Component, Path, PathBuf},
    sync::Arc,
};
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// Directory listing HTML template (embedded at compile time)
const DIRECTORY_TEMPLATE: &str = include_str!("embed/serve/directory.html");

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

// ============================================================================
// Server Entry Point
// ============================================================================

/// Build the site, then serve `[build].output` until Ctrl+C.
pub fn serve_site(config: &DocsConfig) -> Result<()> {
    config.validate()?;
    let interface = config.interface()?;

    let report = build_site(config)?;
    log!(
        "build";
        "built {} files (transformed {})",
        report.copied,
        report.transformed
    );

    let (server, addr) = try_bind_port(interface, config.serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "server stopped");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!(
        "serve";
        "serving {} at http://localhost:{}",
        config.build.output.display(),
        addr.port()
    );

    // Blocks until the Ctrl+C handler unblocks the server
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &config.build.output) {
            log!("serve"; "request error: {e}");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(interface: IpAddr, base_port: u16, max_retries: u16) -> Result<(Server, SocketAddr)> {
    let mut last_err = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_err = Some(e),
        }
    }

    Err(anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries.saturating_sub(1)),
        last_err.map(|e| e.to_string()).unwrap_or_default()
    ))
}

// ============================================================================
// Request Handling
// ============================================================================

/// What a request path maps to inside the serve root.
#[derive(Debug, PartialEq, Eq)]
enum Resolved {
    File(PathBuf),
    Listing(PathBuf),
    NotFound,
}

/// Resolve a raw request URL against the serve root.
///
/// Resolution order:
/// 1. Exact file match → serve file
/// 2. Directory with index.html → serve index.html
/// 3. Directory without index.html → generate listing
/// 4. Nothing found (or a `..` escape attempt) → 404
fn resolve_request(serve_root: &Path, url: &str) -> (Resolved, String) {
    // Strip query string (e.g., ?t=123456) while `%3F` is still encoded
    let path_without_query = url.split('?').next().unwrap_or(url);

    // Decode URL-encoded characters (e.g., %20 → space)
    let url_path = urlencoding::decode(path_without_query)
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();
    let request_path = url_path.trim_matches('/').to_owned();

    let escapes_root = Path::new(&request_path)
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes_root {
        return (Resolved::NotFound, request_path);
    }

    let local_path = serve_root.join(&request_path);
    let resolved = if local_path.is_file() {
        Resolved::File(local_path)
    } else if local_path.is_dir() {
        let index_path = local_path.join("index.html");
        if index_path.is_file() {
            Resolved::File(index_path)
        } else {
            Resolved::Listing(local_path)
        }
    } else {
        Resolved::NotFound
    };

    (resolved, request_path)
}

/// Handle a single HTTP request.
fn handle_request(request: Request, serve_root: &Path) -> Result<()> {
    let (resolved, request_path) = resolve_request(serve_root, request.url());

    match resolved {
        Resolved::File(path) => serve_file(request, &path),
        Resolved::Listing(dir) => match generate_directory_listing(&dir, &request_path) {
            Ok(listing) => serve_html(request, listing),
            Err(_) => serve_not_found(request),
        },
        Resolved::NotFound => serve_not_found(request),
    }
}

// ============================================================================
// Response Helpers
// ============================================================================

fn content_type(value: &str) -> Result<Header> {
    Header::from_bytes("Content-Type", value).map_err(|()| anyhow!("invalid header `{value}`"))
}

/// Serve a file with appropriate content type.
fn serve_file(request: Request, path: &Path) -> Result<()> {
    let content = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let response = Response::from_data(content).with_header(content_type(guess_content_type(path))?);
    request.respond(response)?;
    Ok(())
}

/// Serve HTML content.
fn serve_html(request: Request, content: String) -> Result<()> {
    let response = Response::from_string(content).with_header(content_type("text/html; charset=utf-8")?);
    request.respond(response)?;
    Ok(())
}

/// Serve 404 Not Found response.
fn serve_not_found(request: Request) -> Result<()> {
    let body = "404 Not Found";
    let response = Response::new(
        StatusCode(404),
        vec![content_type("text/plain")?],
        Cursor::new(body),
        Some(body.len()),
        None,
    );
    request.respond(response)?;
    Ok(())
}

// ============================================================================
// Content Type Detection
// ============================================================================

/// Guess MIME content type from file extension.
///
/// Returns `application/octet-stream` for unknown extensions.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        // Web content
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("xml") => "application/xml; charset=utf-8",

        // Images
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",

        // Documents
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain; charset=utf-8",
        Some("md") => "text/markdown; charset=utf-8",

        _ => "application/octet-stream",
    }
}

// ============================================================================
// Directory Listing
// ============================================================================

/// Generate HTML directory listing for browsing.
///
/// Hidden entries are skipped, directories come first, and a parent link is
/// added below the root.
fn generate_directory_listing(dir_path: &Path, request_path: &str) -> std::io::Result<String> {
    let mut entries: Vec<(bool, String)> = fs::read_dir(dir_path)?
        .filter_map(Result::ok)
        .map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            (is_dir, name)
        })
        .filter(|(_, name)| !name.starts_with('.'))
        .collect();
    entries.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));

    let entries: Vec<String> = entries
        .into_iter()
        .map(|(is_dir, name)| {
            let icon = if is_dir { "📁" } else { "📄" };
            let slash = if is_dir { "/" } else { "" };
            let target = if request_path.is_empty() {
                name.clone()
            } else {
                format!("{request_path}/{name}")
            };
            let href = encode_href(&target);
            let name = escape_html(&name);
            format!(r#"<li><span class="icon">{icon}</span><a href="/{href}{slash}">{name}{slash}</a></li>"#)
        })
        .collect();

    let parent_link = if request_path.is_empty() {
        String::new()
    } else {
        let parent_path = Path::new(request_path)
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        let parent_href = if parent_path.is_empty() {
            "/".to_string()
        } else {
            format!("/{}/", encode_href(&parent_path))
        };
        format!(
            r#"<li class="parent"><span class="icon">📂</span><a href="{parent_href}">..</a></li>"#
        )
    };

    #[allow(clippy::literal_string_with_formatting_args)]
    // These are template placeholders, not format args
    Ok(DIRECTORY_TEMPLATE
        .replace("{path}", &escape_html(request_path))
        .replace("{parent_link}", &parent_link)
        .replace("{entries}", &entries.join("\n            ")))
}

/// Percent-encode each segment of a `/`-separated path.
fn encode_href(path: &str) -> String {
    path.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}

/// Escape special HTML characters in listing text.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("commands")).unwrap();
        fs::create_dir_all(dir.path().join("img")).unwrap();
        fs::write(dir.path().join("index.html"), "home").unwrap();
        fs::write(dir.path().join("commands/init.html"), "init").unwrap();
        fs::write(dir.path().join("img/my logo.png"), "png").unwrap();
        fs::write(dir.path().join("img/.hidden"), "").unwrap();
        dir
    }

    // ------------------------------------------------------------------------
    // resolve_request
    // ------------------------------------------------------------------------

    #[test]
    fn test_resolve_root_index() {
        let dir = site();
        let (resolved, path) = resolve_request(dir.path(), "/");
        assert_eq!(resolved, Resolved::File(dir.path().join("index.html")));
        assert_eq!(path, "");
    }

    #[test]
    fn test_resolve_file_with_query_and_encoding() {
        let dir = site();
        let (resolved, _) = resolve_request(dir.path(), "/img/my%20logo.png?t=1");
        assert_eq!(resolved, Resolved::File(dir.path().join("img/my logo.png")));
    }

    #[test]
    fn test_resolve_directory_without_index() {
        let dir = site();
        let (resolved, path) = resolve_request(dir.path(), "/commands/");
        assert_eq!(resolved, Resolved::Listing(dir.path().join("commands")));
        assert_eq!(path, "commands");
    }

    #[test]
    fn test_resolve_missing_and_escape() {
        let dir = site();
        assert_eq!(resolve_request(dir.path(), "/nope.html").0, Resolved::NotFound);
        assert_eq!(resolve_request(dir.path(), "/../etc/passwd").0, Resolved::NotFound);
        assert_eq!(resolve_request(dir.path(), "/img/%2E%2E/%2E%2E/x").0, Resolved::NotFound);
    }

    // ------------------------------------------------------------------------
    // directory listing
    // ------------------------------------------------------------------------

    #[test]
    fn test_directory_listing_entries() {
        let dir = site();
        let html = generate_directory_listing(&dir.path().join("img"), "img").unwrap();

        assert!(html.contains("Index of /img"));
        assert!(html.contains(r#"<a href="/img/my%20logo.png">my logo.png</a>"#));
        assert!(html.contains(r#"<a href="/">..</a>"#));
        assert!(!html.contains(".hidden"));
    }

    #[test]
    fn test_directory_listing_encodes_names() {
        let dir = site();
        fs::write(dir.path().join("img/a?b&<c>.png"), "").unwrap();
        let html = generate_directory_listing(&dir.path().join("img"), "img").unwrap();

        assert!(html.contains(r#"<a href="/img/a%3Fb%26%3Cc%3E.png">a?b&amp;&lt;c&gt;.png</a>"#));
        assert!(!html.contains("<c>"));
    }

    #[test]
    fn test_listing_href_resolves_back() {
        let dir = site();
        fs::write(dir.path().join("img/what?.png"), "png").unwrap();
        let html = generate_directory_listing(&dir.path().join("img"), "img").unwrap();
        assert!(html.contains(r#"href="/img/what%3F.png""#));

        let (resolved, path) = resolve_request(dir.path(), "/img/what%3F.png?t=1");
        assert_eq!(resolved, Resolved::File(dir.path().join("img/what?.png")));
        assert_eq!(path, "img/what?.png");
    }

    #[test]
    fn test_directory_listing_dirs_first() {
        let dir = site();
        fs::remove_file(dir.path().join("index.html")).unwrap();
        fs::write(dir.path().join("a.html"), "").unwrap();
        let html = generate_directory_listing(dir.path(), "").unwrap();

        let commands = html.find(r#"href="/commands/""#).unwrap();
        let file = html.find(r#"href="/a.html""#).unwrap();
        assert!(commands < file);
        assert!(!html.contains(r#"class="parent""#));
    }

    // ------------------------------------------------------------------------
    // content types
    // ------------------------------------------------------------------------

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type(Path::new("index.html")), "text/html; charset=utf-8");
        assert_eq!(guess_content_type(Path::new("styles.css")), "text/css; charset=utf-8");
        assert_eq!(guess_content_type(Path::new("img/logo.PNG")), "application/octet-stream");
        assert_eq!(guess_content_type(Path::new("img/logo.svg")), "image/svg+xml");
        assert_eq!(guess_content_type(Path::new("CNAME")), "application/octet-stream");
    }
}
