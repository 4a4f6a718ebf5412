//! repopulse: repository activity metrics with a synthetic fallback.
//!
//! The library backs the `repopulse` binary and the integration tests.

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod logging;
pub mod metrics;
pub mod stats;
pub mod web;
