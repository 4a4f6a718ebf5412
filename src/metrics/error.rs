use thiserror::Error;

/// Why a real metrics series could not be served.
///
/// None of these reach the presentation layer through
/// [`MetricsProvider::fetch`](super::MetricsProvider::fetch); they are logged
/// and recorded as the reason for the synthetic fallback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    #[error("no metrics endpoint configured")]
    ConfigurationAbsent,

    #[error("request failed: {0}")]
    Transport(String),

    #[error("endpoint returned HTTP {0}")]
    Status(u16),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    #[error("invalid series: {0}")]
    InvalidSeries(String),
}
