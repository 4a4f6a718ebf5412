//! Embedded web dashboard.
//!
//! A synchronous `tiny_http` server that serves:
//! - the single-page dashboard (cards, six charts, window selector)
//! - JSON endpoints for the series, the derived view, config and health
//!
//! Launched via `repopulse web` (default: `http://127.0.0.1:9747`).

mod api;
mod frontend;

use std::io::Cursor;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};
use tracing::{info, warn};

use crate::config::RepopulseConfig;
use crate::metrics::{DateRange, MetricsProvider};

pub(crate) type HttpResponse = Response<Cursor<Vec<u8>>>;

/// Everything a request handler needs, resolved once at startup.
pub struct WebContext {
    pub provider: MetricsProvider,
    pub repo: String,
    pub default_range: DateRange,
    pub config: RepopulseConfig,
}

impl WebContext {
    pub fn from_config(config: &RepopulseConfig) -> Self {
        Self {
            provider: MetricsProvider::from_config(&config.source),
            repo: config.source.repo.clone(),
            default_range: config.source.default_days,
            config: config.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Serve the dashboard on `addr`. Blocks the current thread.
///
/// Requests are handled one at a time; a failing handler produces a 500
/// response and the server keeps running.
pub fn serve(ctx: &WebContext, addr: &str, open: bool) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("repopulse dashboard running at http://{addr}");
    println!("Press Ctrl+C to stop.\n");

    if open && let Err(e) = open_browser(&format!("http://{addr}")) {
        warn!(error = %e, "could not open browser");
    }

    for request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let response = dispatch(ctx, &method, &url).unwrap_or_else(|e| {
            warn!(%method, %url, error = %e, "request failed");
            error_response(500, &e.to_string())
        });

        info!(%method, %url, status = response.status_code().0, "request");
        if let Err(e) = request.respond(response) {
            warn!(error = %e, "failed to send response");
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Route one request to its handler.
pub(crate) fn dispatch(ctx: &WebContext, method: &Method, url: &str) -> Result<HttpResponse> {
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        (&Method::Get, "/") | (&Method::Get, "/index.html") => Ok(serve_frontend()),

        (&Method::Get, "/api/ranges") => api::get_ranges(),
        (&Method::Get, "/api/metrics") => api::get_metrics(ctx, url),
        (&Method::Get, "/api/dashboard") => api::get_dashboard(ctx, url),
        (&Method::Get, "/api/config") => api::get_config(ctx),
        (&Method::Get, "/api/health") => api::get_health(ctx),

        _ => Ok(error_response(404, "not found")),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn serve_frontend() -> HttpResponse {
    Response::from_data(frontend::INDEX_HTML.as_bytes().to_vec())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200))
}

/// JSON error body with the given status.
pub(crate) fn error_response(status: u16, message: &str) -> HttpResponse {
    let body = serde_json::json!({ "error": message }).to_string();
    Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(status))
}

pub(crate) fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8")
        .expect("static header is valid")
}

fn content_type_html() -> Header {
    Header::from_bytes("Content-Type", "text/html; charset=utf-8").expect("static header is valid")
}

/// Best-effort: open `url` in the system browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    std::process::Command::new("cmd")
        .args(["/C", "start", url])
        .spawn()
        .context("failed to open browser")?;

    #[cfg(target_os = "macos")]
    std::process::Command::new("open")
        .arg(url)
        .spawn()
        .context("failed to open browser")?;

    #[cfg(target_os = "linux")]
    std::process::Command::new("xdg-open")
        .arg(url)
        .spawn()
        .context("failed to open browser")?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
