//! Metrics retrieval: the data model, the endpoint client and its
//! synthetic fallback.

pub mod error;
pub mod provider;
pub mod row;
pub mod synthetic;
pub mod validation;

pub use error::MetricsError;
pub use provider::{FetchedSeries, MetricsProvider, MetricsSource, SeriesSource};
pub use row::{DateRange, MetricField, MetricRow};
