//! JSON API handlers for the web dashboard.
//!
//! Each API request resolves a fresh series; nothing is cached between
//! requests.

use anyhow::{Context, Result};
use serde::Serialize;
use tiny_http::{Response, StatusCode};

use crate::config::RepopulseConfig;
use crate::dashboard::DashboardView;
use crate::metrics::{DateRange, MetricRow, MetricsSource, SeriesSource};

use super::{HttpResponse, WebContext, content_type_json, error_response};

// ---------------------------------------------------------------------------
// JSON response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct RangeOption {
    days: u32,
    label: &'static str,
}

#[derive(Serialize)]
struct MetricsResponse {
    repo: String,
    days: u32,
    source: SeriesSource,
    rows: Vec<MetricRow>,
}

#[derive(Serialize)]
struct ConfigResponse<'a> {
    config: &'a RepopulseConfig,
    toml_text: String,
}

#[derive(Serialize)]
struct HealthResponse {
    repo: String,
    endpoint: Option<String>,
    reachable: bool,
    /// Why real data is unavailable, when it is.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    rows: usize,
}

// ---------------------------------------------------------------------------
// Request parsing
// ---------------------------------------------------------------------------

/// Repository and window requested by `?repo=..&days=..`.
struct WindowQuery {
    repo: String,
    range: DateRange,
}

/// Read one raw query parameter from a URL.
fn query_param<'a>(url: &'a str, key: &str) -> Option<&'a str> {
    url.split_once('?')?.1.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == key).then_some(v)
    })
}

/// Decode a form-encoded query value; undecodable input is kept raw.
fn percent_decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| spaced.clone())
}

/// Resolve the window query, falling back to the server defaults.
///
/// An unsupported `days` value is a client error, not a fallback.
fn parse_window(ctx: &WebContext, url: &str) -> Result<WindowQuery, String> {
    let range = match query_param(url, "days") {
        Some(raw) => raw.parse::<DateRange>()?,
        None => ctx.default_range,
    };
    let repo = query_param(url, "repo")
        .map(percent_decode)
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| ctx.repo.clone());
    Ok(WindowQuery { repo, range })
}

fn json_response<T: Serialize>(data: &T) -> Result<HttpResponse> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(200)))
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `GET /api/ranges` — the selectable windows.
pub fn get_ranges() -> Result<HttpResponse> {
    let ranges: Vec<RangeOption> = DateRange::ALL
        .iter()
        .map(|r| RangeOption {
            days: r.days(),
            label: r.label(),
        })
        .collect();
    json_response(&ranges)
}

/// `GET /api/metrics?days=N&repo=R` — the raw series.
pub fn get_metrics(ctx: &WebContext, url: &str) -> Result<HttpResponse> {
    let query = match parse_window(ctx, url) {
        Ok(q) => q,
        Err(msg) => return Ok(error_response(400, &msg)),
    };
    let series = ctx.provider.fetch(&query.repo, query.range);

    json_response(&MetricsResponse {
        repo: query.repo,
        days: query.range.days(),
        source: series.source,
        rows: series.rows,
    })
}

/// `GET /api/dashboard?days=N&repo=R` — series plus cards and charts.
pub fn get_dashboard(ctx: &WebContext, url: &str) -> Result<HttpResponse> {
    let query = match parse_window(ctx, url) {
        Ok(q) => q,
        Err(msg) => return Ok(error_response(400, &msg)),
    };
    let series = ctx.provider.fetch(&query.repo, query.range);
    json_response(&DashboardView::build(&query.repo, query.range, series))
}

/// `GET /api/config` — the effective configuration.
pub fn get_config(ctx: &WebContext) -> Result<HttpResponse> {
    let toml_text =
        toml::to_string_pretty(&ctx.config).context("failed to serialize effective config")?;
    json_response(&ConfigResponse {
        config: &ctx.config,
        toml_text,
    })
}

/// `GET /api/health` — whether the endpoint currently serves real data.
pub fn get_health(ctx: &WebContext) -> Result<HttpResponse> {
    let result = ctx.provider.try_fetch(&ctx.repo, ctx.default_range);
    let (reachable, rows, error) = match result {
        Ok(rows) => (true, rows.len(), None),
        Err(e) => (false, 0, Some(e.to_string())),
    };

    json_response(&HealthResponse {
        repo: ctx.repo.clone(),
        endpoint: ctx.provider.endpoint().map(str::to_string),
        reachable,
        error,
        rows,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
