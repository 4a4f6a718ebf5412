/// Integration tests for the metrics provider against a local HTTP endpoint.
///
/// Each test starts a throwaway `tiny_http` server on an ephemeral port that
/// answers a fixed number of requests and reports the URLs it saw.
use std::sync::mpsc::{self, Receiver};
use std::thread;

use chrono::{Days, NaiveDate, Utc};
use repopulse::metrics::{DateRange, MetricsError, MetricsProvider, MetricsSource, SeriesSource};
use tiny_http::{Header, Response, Server};

// ===========================================================================
// Helpers
// ===========================================================================

/// One request as the mock endpoint saw it.
struct SeenRequest {
    url: String,
    headers: Vec<(String, String)>,
}

impl SeenRequest {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Serve `requests` responses of `status` / `body`; returns base URL and a
/// receiver for the requests seen.
fn mock_endpoint(status: u16, body: String, requests: usize) -> (String, Receiver<SeenRequest>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for _ in 0..requests {
            let Ok(request) = server.recv() else { return };
            let _ = tx.send(SeenRequest {
                url: request.url().to_string(),
                headers: request
                    .headers()
                    .iter()
                    .map(|h| (h.field.to_string(), h.value.to_string()))
                    .collect(),
            });
            let header = Header::from_bytes("Content-Type", "application/json").unwrap();
            let response = Response::from_string(body.clone())
                .with_header(header)
                .with_status_code(status);
            let _ = request.respond(response);
        }
    });

    (format!("http://{addr}/metrics"), rx)
}

fn rows_json(days: u32, end: NaiveDate) -> String {
    let start = end.checked_sub_days(Days::new(u64::from(days) - 1)).unwrap();
    let rows: Vec<serde_json::Value> = (0..days)
        .map(|i| {
            let date = start.checked_add_days(Days::new(u64::from(i))).unwrap();
            serde_json::json!({
                "date": date.to_string(),
                "commits": i + 1,
                "forks": 11,
                "open_issues": 4,
                "stars": 60 + i,
                "top_lang": "Rust",
                "watchers": 20,
                "size_kb": 5500,
            })
        })
        .collect();
    serde_json::Value::Array(rows).to_string()
}

fn day(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

// ===========================================================================
// 1. Real data
// ===========================================================================

#[test]
fn valid_array_is_returned_as_remote() {
    let (url, seen) = mock_endpoint(200, rows_json(7, day("2024-03-10")), 1);
    let series = MetricsProvider::new(&url).fetch("octo/demo", DateRange::Week);

    assert_eq!(series.source, SeriesSource::Remote);
    assert_eq!(series.rows.len(), 7);
    assert_eq!(series.rows[0].date, day("2024-03-04"));
    assert_eq!(series.rows[6].stars, 66);
    assert_eq!(series.rows[6].top_lang, "Rust");

    let requested = seen.recv().unwrap();
    assert!(requested.url.starts_with("/metrics?"));
    assert!(requested.url.contains("repo=octo%2Fdemo"));
    assert!(requested.url.contains("days=7"));
    assert_eq!(requested.header("Cache-Control"), Some("no-cache"));
    assert_eq!(requested.header("Pragma"), Some("no-cache"));
}

#[test]
fn trailing_slash_in_base_url_is_ignored() {
    let (url, seen) = mock_endpoint(200, rows_json(14, day("2024-03-10")), 1);
    let rows = MetricsProvider::new(&format!("{url}/")).get_metrics("octo/demo", DateRange::Fortnight);

    assert_eq!(rows.len(), 14);
    assert!(seen.recv().unwrap().url.starts_with("/metrics?"));
}

#[test]
fn every_call_hits_the_endpoint() {
    let (url, seen) = mock_endpoint(200, rows_json(7, day("2024-03-10")), 2);
    let provider = MetricsProvider::new(&url);

    provider.fetch("octo/demo", DateRange::Week);
    provider.fetch("octo/demo", DateRange::Week);

    let requests: Vec<SeenRequest> = seen.iter().take(2).collect();
    assert_eq!(requests.len(), 2);
    for request in &requests {
        assert_eq!(request.header("Cache-Control"), Some("no-cache"));
        assert_eq!(request.header("Pragma"), Some("no-cache"));
    }
}

// ===========================================================================
// 2. Fallback to synthetic data
// ===========================================================================

#[test]
fn server_error_falls_back_to_synthetic() {
    let (url, _seen) = mock_endpoint(500, "{}".to_string(), 1);
    let series = MetricsProvider::new(&url).with_seed(Some(3)).fetch("octo/demo", DateRange::Week);

    assert!(series.source.is_synthetic());
    assert_eq!(series.rows.len(), 7);
}

#[test]
fn server_error_surfaces_status_in_try_fetch() {
    let (url, _seen) = mock_endpoint(503, "{}".to_string(), 1);
    let err = MetricsProvider::new(&url).try_fetch("octo/demo", DateRange::Week).unwrap_err();
    assert_eq!(err, MetricsError::Status(503));
}

#[test]
fn object_payload_falls_back_to_synthetic() {
    let (url, _seen) = mock_endpoint(200, r#"{"rows": []}"#.to_string(), 2);
    let provider = MetricsProvider::new(&url);

    let series = provider.fetch("octo/demo", DateRange::Fortnight);
    assert!(series.source.is_synthetic());
    assert_eq!(series.rows.len(), 14);

    let err = provider.try_fetch("octo/demo", DateRange::Fortnight).unwrap_err();
    assert!(matches!(err, MetricsError::MalformedPayload(_)));
}

#[test]
fn mistyped_row_is_malformed() {
    let body = r#"[{"date": "2024-03-10", "commits": "many"}]"#.to_string();
    let (url, _seen) = mock_endpoint(200, body, 1);
    let err = MetricsProvider::new(&url).try_fetch("octo/demo", DateRange::Week).unwrap_err();
    assert!(matches!(err, MetricsError::MalformedPayload(_)));
}

#[test]
fn unreachable_endpoint_falls_back() {
    // Bind then drop to get a port nothing listens on.
    let addr = {
        let server = Server::http("127.0.0.1:0").unwrap();
        server.server_addr().to_ip().unwrap()
    };
    let provider = MetricsProvider::new(&format!("http://{addr}/metrics"));

    let series = provider.fetch("octo/demo", DateRange::Month);
    assert!(series.source.is_synthetic());
    assert_eq!(series.rows.len(), 30);
}

// ===========================================================================
// 3. Series shape: lenient vs strict
// ===========================================================================

#[test]
fn short_series_is_accepted_when_lenient() {
    let (url, _seen) = mock_endpoint(200, rows_json(5, day("2024-03-10")), 1);
    let series = MetricsProvider::new(&url).fetch("octo/demo", DateRange::Week);

    assert_eq!(series.source, SeriesSource::Remote);
    assert_eq!(series.rows.len(), 5);
}

#[test]
fn short_series_is_rejected_when_strict() {
    let (url, _seen) = mock_endpoint(200, rows_json(5, day("2024-03-10")), 2);
    let provider = MetricsProvider::new(&url).strict(true);

    let series = provider.fetch("octo/demo", DateRange::Week);
    assert!(series.source.is_synthetic());
    assert_eq!(series.rows.len(), 7);

    let err = provider.try_fetch("octo/demo", DateRange::Week).unwrap_err();
    assert!(matches!(err, MetricsError::InvalidSeries(_)));
}

#[test]
fn empty_array_is_remote_when_lenient() {
    let (url, _seen) = mock_endpoint(200, "[]".to_string(), 1);
    let series = MetricsProvider::new(&url).fetch("octo/demo", DateRange::Week);

    assert_eq!(series.source, SeriesSource::Remote);
    assert!(series.rows.is_empty());
}

// ===========================================================================
// 4. No endpoint configured
// ===========================================================================

#[test]
fn no_endpoint_yields_window_ending_today() {
    let provider = MetricsProvider::synthetic_only();

    for range in DateRange::ALL {
        let today = Utc::now().date_naive();
        let series = provider.fetch("octo/demo", range);
        assert_eq!(series.rows.len(), range.days() as usize);

        let last = series.rows.last().unwrap().date;
        // Tolerate a UTC midnight rollover between the two reads.
        assert!(last == today || last == today.succ_opt().unwrap());
        for pair in series.rows.windows(2) {
            assert_eq!(pair[0].date.succ_opt(), Some(pair[1].date));
        }
    }
}

#[test]
fn blank_endpoint_reports_configuration_absent() {
    let provider = MetricsProvider::new("   ");
    assert_eq!(provider.endpoint(), None);
    assert_eq!(
        provider.try_fetch("octo/demo", DateRange::Week).unwrap_err(),
        MetricsError::ConfigurationAbsent
    );
    match provider.fetch("octo/demo", DateRange::Week).source {
        SeriesSource::Synthetic { reason } => assert_eq!(reason, "no metrics endpoint configured"),
        SeriesSource::Remote => panic!("expected synthetic data"),
    }
}
