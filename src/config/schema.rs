/// Configuration schema and defaults for repopulse.
///
/// Sections: `[source]`, `[web]` and `[logging]`. Every field has a built-in
/// default, so a config file only needs the keys it changes.
use serde::{Deserialize, Serialize};

use crate::metrics::DateRange;

/// Repository shown when none is configured.
pub const DEFAULT_REPO: &str = "danushgopinath/cp-leetcode-solutions";

/// Default bind address for `repopulse web`.
pub const DEFAULT_WEB_ADDR: &str = "127.0.0.1:9747";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Maps to `~/.repopulse/config.toml` and `.repopulse.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepopulseConfig {
    pub source: SourceConfig,
    pub web: WebConfig,
    pub logging: LoggingConfig,
}

// ---------------------------------------------------------------------------
// [source]
// ---------------------------------------------------------------------------

/// Where metrics come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Base URL of the metrics endpoint. Empty means synthetic data only.
    pub metrics_url: String,
    /// Repository identifier passed as `?repo=`.
    pub repo: String,
    /// Window used when none is given on the command line.
    pub default_days: DateRange,
    /// Reject series whose length or ordering is off instead of warning.
    pub strict_validation: bool,
    /// Fixed seed for synthetic data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            metrics_url: String::new(),
            repo: DEFAULT_REPO.to_string(),
            default_days: DateRange::default(),
            strict_validation: false,
            seed: None,
        }
    }
}

// ---------------------------------------------------------------------------
// [web]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub addr: String,
    /// Open the dashboard in the default browser on start.
    pub open_browser: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_WEB_ADDR.to_string(),
            open_browser: true,
        }
    }
}

// ---------------------------------------------------------------------------
// [logging]
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `error`, `warn`, `info`, `debug` or `trace`. `RUST_LOG` wins if set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Annotated default file
// ---------------------------------------------------------------------------

impl RepopulseConfig {
    /// The commented config written by `repopulse config init`.
    pub fn default_toml() -> String {
        format!(
            r#"# repopulse configuration
#
# Precedence (highest wins):
#   1. Environment variables (REPOPULSE_*)
#   2. Project config (.repopulse.toml in the current directory)
#   3. User global config (~/.repopulse/config.toml)
#   4. Built-in defaults

[source]
metrics_url = ""          # Empty -> synthetic data (REPOPULSE_METRICS_URL)
repo = "{DEFAULT_REPO}"
default_days = 30         # 7 | 14 | 30
strict_validation = false # Reject mis-shaped series instead of warning
# seed = 42               # Fixed seed for synthetic data

[web]
addr = "{DEFAULT_WEB_ADDR}"
open_browser = true

[logging]
level = "info"            # error | warn | info | debug | trace
"#
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RepopulseConfig::default();
        assert!(config.source.metrics_url.is_empty());
        assert_eq!(config.source.repo, DEFAULT_REPO);
        assert_eq!(config.source.default_days, DateRange::Month);
        assert_eq!(config.web.addr, DEFAULT_WEB_ADDR);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn default_toml_parses_back_to_defaults() {
        let config: RepopulseConfig = toml::from_str(&RepopulseConfig::default_toml()).unwrap();
        assert_eq!(config, RepopulseConfig::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: RepopulseConfig = toml::from_str(
            r#"
[source]
metrics_url = "https://metrics.example.com"
default_days = 7
"#,
        )
        .unwrap();
        assert_eq!(config.source.metrics_url, "https://metrics.example.com");
        assert_eq!(config.source.default_days, DateRange::Week);
        assert_eq!(config.source.repo, DEFAULT_REPO);
        assert!(config.web.open_browser);
    }

    #[test]
    fn unsupported_window_is_rejected() {
        let result: Result<RepopulseConfig, _> = toml::from_str("[source]\ndefault_days = 10\n");
        assert!(result.is_err());
    }

    #[test]
    fn serialized_config_round_trips_through_toml() {
        let mut config = RepopulseConfig::default();
        config.source.seed = Some(9);
        let text = toml::to_string_pretty(&config).unwrap();
        let back: RepopulseConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
