//! Dashboard presenter.
//!
//! Owns the selected window and the series currently on display. Each
//! selection change fetches on its own worker thread; results are applied
//! through [`DashboardState`] so that a slow response for an older selection
//! can never overwrite a newer one.

pub mod charts;
pub mod state;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use serde::Serialize;
use tracing::debug;

use crate::metrics::{DateRange, FetchedSeries, MetricRow, MetricsSource, SeriesSource};
use crate::stats::{self, StatCard};

pub use charts::{ChartData, ChartKind, Dataset};
pub use state::{DashboardSnapshot, DashboardState, RequestTicket};

/// Callback invoked after a result has been applied.
pub type Listener = Arc<dyn Fn(&DashboardSnapshot) + Send + Sync>;

// ---------------------------------------------------------------------------
// Presenter
// ---------------------------------------------------------------------------

pub struct Dashboard {
    source: Arc<dyn MetricsSource>,
    repo: String,
    state: Arc<Mutex<DashboardState>>,
    listener: Option<Listener>,
}

impl Dashboard {
    pub fn new(source: Arc<dyn MetricsSource>, repo: impl Into<String>, initial: DateRange) -> Self {
        Self {
            source,
            repo: repo.into(),
            state: Arc::new(Mutex::new(DashboardState::new(initial))),
            listener: None,
        }
    }

    /// Register a callback run on the worker thread after each applied result.
    ///
    /// The callback runs while the dashboard state is locked; it must not
    /// call back into the dashboard.
    pub fn with_listener(mut self, listener: Listener) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    /// Switch to `range` and fetch its series in the background.
    ///
    /// The handle resolves to `true` if this fetch's result was applied,
    /// `false` if a newer selection or [`close`](Self::close) superseded it.
    pub fn select(&self, range: DateRange) -> JoinHandle<bool> {
        let ticket = lock(&self.state).begin(range);
        debug!(generation = ticket.generation, days = range.days(), "window selected");

        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let listener = self.listener.clone();
        let repo = self.repo.clone();

        thread::spawn(move || {
            let series = source.fetch(&repo, ticket.range);

            // Listener runs under the lock: renders follow generation order.
            let mut guard = lock(&state);
            if !guard.complete(ticket, series) {
                debug!(generation = ticket.generation, "discarding stale response");
                return false;
            }
            if let Some(listener) = listener {
                listener(&guard.snapshot());
            }
            true
        })
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        lock(&self.state).snapshot()
    }

    /// Tear down: results still in flight are discarded.
    pub fn close(&self) {
        lock(&self.state).close();
    }
}

fn lock(state: &Mutex<DashboardState>) -> MutexGuard<'_, DashboardState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// Rendered view
// ---------------------------------------------------------------------------

/// Everything a surface needs to draw the dashboard for one window.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub repo: String,
    pub days: u32,
    pub label: &'static str,
    pub source: SeriesSource,
    pub rows: Vec<MetricRow>,
    pub cards: Vec<StatCard>,
    pub charts: Vec<ChartData>,
}

impl DashboardView {
    pub fn build(repo: &str, range: DateRange, series: FetchedSeries) -> Self {
        let cards = stats::summary_cards(&series.rows);
        let charts = charts::build_charts(&series.rows);
        Self {
            repo: repo.to_string(),
            days: range.days(),
            label: range.label(),
            source: series.source,
            rows: series.rows,
            cards,
            charts,
        }
    }
}
