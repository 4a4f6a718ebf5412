/// Metrics endpoint client with the synthetic-data fallback policy.
///
/// Talks to the configured endpoint with the synchronous `ureq` client:
///
/// - **fetch**: one `GET <base>?repo=<repo>&days=<days>`, always fresh.
///   Any failure is logged and replaced by a synthetic series, so callers
///   always receive `days` rows.
/// - **try_fetch**: the same request without the fallback, for diagnostics.
///
/// No retries, no backoff and no timeout: a single attempt, then fallback.
use chrono::{NaiveDate, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, warn};

use super::error::MetricsError;
use super::row::{DateRange, MetricRow};
use super::{synthetic, validation};
use crate::config::schema::SourceConfig;

// ---------------------------------------------------------------------------
// Source seam
// ---------------------------------------------------------------------------

/// Anything that can resolve a metrics series for a window.
///
/// Implementations must not fail: errors are absorbed and replaced by a
/// usable series.
pub trait MetricsSource: Send + Sync {
    fn fetch(&self, repo: &str, range: DateRange) -> FetchedSeries;
}

/// Where a series came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SeriesSource {
    Remote,
    Synthetic { reason: String },
}

impl SeriesSource {
    pub fn is_synthetic(&self) -> bool {
        matches!(self, Self::Synthetic { .. })
    }
}

/// A resolved series plus its provenance.
#[derive(Debug, Clone, Serialize)]
pub struct FetchedSeries {
    pub rows: Vec<MetricRow>,
    pub source: SeriesSource,
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// HTTP-backed [`MetricsSource`].
#[derive(Debug, Clone)]
pub struct MetricsProvider {
    /// Endpoint without trailing slash; `None` means synthetic-only.
    base_url: Option<String>,
    strict_validation: bool,
    seed: Option<u64>,
    today: Option<NaiveDate>,
}

impl MetricsProvider {
    /// Build a provider from the resolved `[source]` config.
    pub fn from_config(config: &SourceConfig) -> Self {
        Self::new(&config.metrics_url)
            .strict(config.strict_validation)
            .with_seed(config.seed)
    }

    /// Build a provider for `base_url`. Empty or blank means no endpoint.
    pub fn new(base_url: &str) -> Self {
        let trimmed = base_url.trim().trim_end_matches('/');
        Self {
            base_url: (!trimmed.is_empty()).then(|| trimmed.to_string()),
            strict_validation: false,
            seed: None,
            today: None,
        }
    }

    /// A provider that never touches the network.
    pub fn synthetic_only() -> Self {
        Self::new("")
    }

    /// Treat series shape violations as failures instead of warnings.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_validation = strict;
        self
    }

    /// Fix the synthetic data seed (`None` = fresh randomness per call).
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Pin "today" for synthetic series instead of the current UTC date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// The configured endpoint, if any.
    pub fn endpoint(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Resolve the rows for `(repo, range)`. Never fails.
    pub fn get_metrics(&self, repo: &str, range: DateRange) -> Vec<MetricRow> {
        self.resolve(repo, range).rows
    }

    /// Request the series from the endpoint without falling back.
    pub fn try_fetch(&self, repo: &str, range: DateRange) -> Result<Vec<MetricRow>, MetricsError> {
        let base = self
            .base_url
            .as_deref()
            .ok_or(MetricsError::ConfigurationAbsent)?;
        let days = range.days();

        debug!(endpoint = base, repo, days, "requesting metrics");

        let response = ureq::get(base)
            .query("repo", repo)
            .query("days", &days.to_string())
            .set("Cache-Control", "no-cache")
            .set("Pragma", "no-cache")
            .call()
            .map_err(|err| match err {
                ureq::Error::Status(code, _) => MetricsError::Status(code),
                ureq::Error::Transport(transport) => MetricsError::Transport(transport.to_string()),
            })?;

        let payload: serde_json::Value = response
            .into_json()
            .map_err(|e| MetricsError::MalformedPayload(format!("body is not JSON: {e}")))?;

        let rows = decode_rows(payload)?;

        if let Err(err) = validation::check_series(&rows, days) {
            if self.strict_validation {
                return Err(err);
            }
            warn!(repo, days, error = %err, "endpoint series has an unexpected shape; using it as-is");
        }

        Ok(rows)
    }

    /// Produce a synthetic series for `days`.
    pub fn synthetic(&self, days: u32) -> Vec<MetricRow> {
        let today = self.today.unwrap_or_else(|| Utc::now().date_naive());
        match self.seed {
            Some(seed) => synthetic::generate(days, today, &mut StdRng::seed_from_u64(seed)),
            None => synthetic::generate(days, today, &mut rand::thread_rng()),
        }
    }

    fn resolve(&self, repo: &str, range: DateRange) -> FetchedSeries {
        match self.try_fetch(repo, range) {
            Ok(rows) => FetchedSeries {
                rows,
                source: SeriesSource::Remote,
            },
            Err(err) => {
                match err {
                    MetricsError::ConfigurationAbsent => {
                        warn!("no metrics endpoint configured; using synthetic data")
                    }
                    _ => warn!(repo, days = range.days(), error = %err, "metrics fetch failed; using synthetic data"),
                }
                FetchedSeries {
                    rows: self.synthetic(range.days()),
                    source: SeriesSource::Synthetic {
                        reason: err.to_string(),
                    },
                }
            }
        }
    }
}

impl MetricsSource for MetricsProvider {
    fn fetch(&self, repo: &str, range: DateRange) -> FetchedSeries {
        self.resolve(repo, range)
    }
}

/// Require a top-level JSON array and decode each element as a row.
fn decode_rows(payload: serde_json::Value) -> Result<Vec<MetricRow>, MetricsError> {
    let serde_json::Value::Array(items) = payload else {
        return Err(MetricsError::MalformedPayload(format!(
            "expected a JSON array, got {}",
            json_kind(&payload)
        )));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            serde_json::from_value::<MetricRow>(item)
                .map_err(|e| MetricsError::MalformedPayload(format!("row {idx}: {e}")))
        })
        .collect()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn blank_url_means_no_endpoint() {
        assert_eq!(MetricsProvider::new("").endpoint(), None);
        assert_eq!(MetricsProvider::new("   ").endpoint(), None);
    }

    #[test]
    fn strips_trailing_slash() {
        let provider = MetricsProvider::new("https://metrics.example.com/api/");
        assert_eq!(provider.endpoint(), Some("https://metrics.example.com/api"));
    }

    #[test]
    fn from_config_carries_options() {
        let config = SourceConfig {
            metrics_url: "http://localhost:8080/".to_string(),
            strict_validation: true,
            seed: Some(3),
            ..SourceConfig::default()
        };
        let provider = MetricsProvider::from_config(&config);
        assert_eq!(provider.endpoint(), Some("http://localhost:8080"));
        assert!(provider.strict_validation);
        assert_eq!(provider.seed, Some(3));
    }

    #[test]
    fn try_fetch_without_endpoint_reports_configuration_absent() {
        let provider = MetricsProvider::synthetic_only();
        assert_eq!(
            provider.try_fetch("a/b", DateRange::Week),
            Err(MetricsError::ConfigurationAbsent)
        );
    }

    #[test]
    fn fetch_without_endpoint_is_synthetic() {
        let provider = MetricsProvider::synthetic_only().with_seed(Some(5));
        let series = provider.fetch("a/b", DateRange::Fortnight);
        assert_eq!(series.rows.len(), 14);
        assert_eq!(
            series.source,
            SeriesSource::Synthetic {
                reason: "no metrics endpoint configured".to_string()
            }
        );
    }

    #[test]
    fn seeded_synthetic_is_reproducible() {
        let today = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
        let provider = MetricsProvider::synthetic_only()
            .with_seed(Some(11))
            .with_today(today);
        assert_eq!(provider.synthetic(7), provider.synthetic(7));
        assert_eq!(provider.synthetic(7).last().unwrap().date, today);
    }

    #[test]
    fn decode_rows_rejects_object() {
        let err = decode_rows(json!({"rows": []})).unwrap_err();
        assert_eq!(
            err,
            MetricsError::MalformedPayload("expected a JSON array, got an object".to_string())
        );
    }

    #[test]
    fn decode_rows_rejects_mistyped_fields() {
        let payload = json!([{
            "date": "2025-01-01", "commits": "three", "forks": 1, "open_issues": 1,
            "stars": 1, "top_lang": "Go", "watchers": 1, "size_kb": 1
        }]);
        let err = decode_rows(payload).unwrap_err();
        assert!(err.to_string().starts_with("malformed payload: row 0"));
    }

    #[test]
    fn decode_rows_accepts_rows() {
        let payload = json!([{
            "date": "2025-01-01", "commits": 3, "forks": 1, "open_issues": 1,
            "stars": 1, "top_lang": "Go", "watchers": 1, "size_kb": 1
        }]);
        let rows = decode_rows(payload).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].commits, 3);
    }

    #[test]
    fn series_source_serializes_with_kind_tag() {
        let remote = serde_json::to_value(SeriesSource::Remote).unwrap();
        assert_eq!(remote, json!({"kind": "remote"}));

        let synthetic = serde_json::to_value(SeriesSource::Synthetic {
            reason: "endpoint returned HTTP 500".to_string(),
        })
        .unwrap();
        assert_eq!(
            synthetic,
            json!({"kind": "synthetic", "reason": "endpoint returned HTTP 500"})
        );
    }
}
