//! Development server for the workspace output.
//!
//! A small `tiny_http` server over `dist/`:
//!
//! - Static file serving with MIME guessing
//! - `index.html` resolution and a directory listing fallback
//! - Reload client injected into every HTML response
//! - Port auto-retry and Ctrl+C shutdown
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐     ┌─────────────────┐
//! │   Main Thread   │     │  Watcher Thread  │     │  Reload Thread  │
//! │  (HTTP Server)  │     │  (File Monitor)  │     │   (WebSocket)   │
//! └────────┬────────┘     └────────┬─────────┘     └────────┬────────┘
//!          │                       │ rebuild ok             │
//!          ▼                       └───────────────────────▶│ "reload"
//!     serve dist/                                           ▼
//!                                                      browser tabs
//! ```

use crate::{config::ServeConfig, log, reload};
use anyhow::{Context, Result, anyhow};
use std::{
    fs,
    io::Cursor,
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
    sync::Arc,
};
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

const DIRECTORY_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Index of /{path}</title>
    <style>
        body { font-family: system-ui, sans-serif; margin: 2rem; }
        ul { list-style: none; padding: 0; }
        li { padding: 0.2rem 0; }
        .icon { display: inline-block; width: 1.5rem; }
    </style>
</head>
<body>
    <h1>Index of /{path}</h1>
    <ul>
            {parent_link}
            {entries}
    </ul>
</body>
</html>
"#;

/// What a request path resolves to.
#[derive(Debug, PartialEq, Eq)]
enum Target {
    File(PathBuf),
    Listing(String),
    NotFound,
}

/// Static file server over one directory.
pub struct DevServer {
    root: PathBuf,
    /// Injected into HTML responses when live reload is on
    reload_script: Option<String>,
}

impl DevServer {
    pub fn new(root: &Path, reload_port: Option<u16>) -> Self {
        Self {
            root: root.to_path_buf(),
            reload_script: reload_port.map(reload::client_script),
        }
    }

    /// Bind and serve until Ctrl+C.
    pub fn run(&self, config: &ServeConfig) -> Result<()> {
        let interface: IpAddr = config
            .interface
            .parse()
            .with_context(|| format!("Invalid serve interface `{}`", config.interface))?;

        let (server, addr) = try_bind_port(interface, config.port, MAX_PORT_RETRIES)?;
        let server = Arc::new(server);

        let server_for_signal = Arc::clone(&server);
        ctrlc::set_handler(move || {
            log!("serve"; "shutting down...");
            server_for_signal.unblock();
        })
        .context("Failed to set Ctrl+C handler")?;

        log!("serve"; "http://{addr}");

        for request in server.incoming_requests() {
            if let Err(e) = self.handle_request(request) {
                log!("serve"; "request error: {e}");
            }
        }

        Ok(())
    }

    fn handle_request(&self, request: Request) -> Result<()> {
        match self.resolve(request.url()) {
            Target::File(path) => self.serve_file(request, &path),
            Target::Listing(html) => serve_html(request, html),
            Target::NotFound => serve_not_found(request),
        }
    }

    /// Resolution order: file, directory `index.html`, directory listing, 404.
    fn resolve(&self, url: &str) -> Target {
        // Decode URL-encoded characters (e.g., %20 → space)
        let url_path = urlencoding::decode(url)
            .map(std::borrow::Cow::into_owned)
            .unwrap_or_default();

        // Strip query string (e.g., ?t=123456) before resolving path
        let path_without_query = url_path.split('?').next().unwrap_or(&url_path);
        let request_path = path_without_query.trim_matches('/');

        if Path::new(request_path)
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Target::NotFound;
        }

        let local_path = self.root.join(request_path);

        if local_path.is_file() {
            return Target::File(local_path);
        }

        if local_path.is_dir() {
            let index_path = local_path.join("index.html");
            if index_path.is_file() {
                return Target::File(index_path);
            }

            if let Ok(listing) = generate_directory_listing(&local_path, request_path) {
                return Target::Listing(listing);
            }
        }

        Target::NotFound
    }

    fn serve_file(&self, request: Request, path: &Path) -> Result<()> {
        let content =
            fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let content_type = guess_content_type(path);

        if let Some(script) = &self.reload_script
            && content_type.starts_with("text/html")
        {
            let html = reload::inject(&String::from_utf8_lossy(&content), script);
            return serve_html(request, html);
        }

        let response = Response::from_data(content).with_header(header("Content-Type", content_type)?);
        request.respond(response)?;
        Ok(())
    }
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(interface: IpAddr, base_port: u16, max_retries: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

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
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries.saturating_sub(1)),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

fn header(name: &str, value: &str) -> Result<Header> {
    Header::from_bytes(name, value).map_err(|()| anyhow!("Invalid header {name}: {value}"))
}

fn serve_html(request: Request, content: String) -> Result<()> {
    let response =
        Response::from_string(content).with_header(header("Content-Type", "text/html; charset=utf-8")?);
    request.respond(response)?;
    Ok(())
}

fn serve_not_found(request: Request) -> Result<()> {
    let body = "404 Not Found";
    let response = Response::new(
        StatusCode(404),
        vec![header("Content-Type", "text/plain")?],
        Cursor::new(body),
        Some(body.len()),
        None,
    );
    request.respond(response)?;
    Ok(())
}

/// Guess MIME content type from file extension.
///
/// Returns `application/octet-stream` for unknown extensions.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        // Web content
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("map" | "json") => "application/json; charset=utf-8",
        Some("xml") => "application/xml; charset=utf-8",

        // Images
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("ico") => "image/x-icon",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Documents
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain; charset=utf-8",

        _ => "application/octet-stream",
    }
}

/// HTML listing of a directory without `index.html`. Hidden entries are left out.
fn generate_directory_listing(dir_path: &Path, request_path: &str) -> std::io::Result<String> {
    let mut names: Vec<(String, bool)> = fs::read_dir(dir_path)?
        .filter_map(Result::ok)
        .map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            (name, is_dir)
        })
        .filter(|(name, _)| !name.starts_with('.'))
        .collect();
    names.sort();

    let entries: Vec<_> = names
        .into_iter()
        .map(|(name, is_dir)| {
            let icon = if is_dir { "📁" } else { "📄" };
            let href = if request_path.is_empty() {
                format!("/{name}")
            } else {
                format!("/{request_path}/{name}")
            };
            format!(r#"<li><span class="icon">{icon}</span><a href="{href}">{name}</a></li>"#)
        })
        .collect();

    let parent_link = if request_path.is_empty() {
        String::new()
    } else {
        let parent_path = Path::new(request_path)
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!(r#"<li class="parent"><span class="icon">📂</span><a href="/{parent_path}">..</a></li>"#)
    };

    #[allow(clippy::literal_string_with_formatting_args)]
    // These are template placeholders, not format args
    Ok(DIRECTORY_TEMPLATE
        .replace("{path}", request_path)
        .replace("{parent_link}", &parent_link)
        .replace("{entries}", &entries.join("\n            ")))
}
