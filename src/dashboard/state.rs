/// View state of the dashboard and its stale-response rule.
///
/// Every window selection opens a new generation. A completed fetch is
/// applied only when it carries the latest generation and the view has not
/// been closed; anything else is a stale response and is dropped.
use serde::Serialize;

use crate::metrics::{DateRange, FetchedSeries, MetricRow, SeriesSource};

/// Identifies one in-flight request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub generation: u64,
    pub range: DateRange,
}

/// Read-only copy of the view state handed to renderers.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub selected: DateRange,
    pub loading: bool,
    pub rows: Vec<MetricRow>,
    /// `None` until the first result has been applied.
    pub source: Option<SeriesSource>,
    pub generation: u64,
}

#[derive(Debug, Default)]
pub struct DashboardState {
    selected: DateRange,
    loading: bool,
    rows: Vec<MetricRow>,
    source: Option<SeriesSource>,
    generation: u64,
    closed: bool,
}

impl DashboardState {
    pub fn new(initial: DateRange) -> Self {
        Self {
            selected: initial,
            ..Self::default()
        }
    }

    /// Start a request for `range`, superseding any request in flight.
    ///
    /// Once closed the view is frozen: the ticket is issued but will never
    /// be applied.
    pub fn begin(&mut self, range: DateRange) -> RequestTicket {
        self.generation += 1;
        if !self.closed {
            self.selected = range;
            self.loading = true;
        }
        RequestTicket {
            generation: self.generation,
            range,
        }
    }

    /// Apply a finished request. Returns `false` if the result was stale.
    pub fn complete(&mut self, ticket: RequestTicket, series: FetchedSeries) -> bool {
        if self.closed || ticket.generation != self.generation {
            return false;
        }
        self.rows = series.rows;
        self.source = Some(series.source);
        self.loading = false;
        true
    }

    /// Tear down the view: nothing in flight will be applied afterwards.
    pub fn close(&mut self) {
        self.closed = true;
        self.loading = false;
        self.generation += 1;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            selected: self.selected,
            loading: self.loading,
            rows: self.rows.clone(),
            source: self.source.clone(),
            generation: self.generation,
        }
    }
}
