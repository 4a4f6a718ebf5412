/// Shape checks for a decoded metrics series.
///
/// Field types are already enforced by decoding into [`MetricRow`]; this
/// covers what the type system cannot: row count, ordering, gaps and
/// duplicate days.
use super::error::MetricsError;
use super::row::MetricRow;

/// Verify `rows` holds exactly `days` consecutive calendar days, ascending.
pub fn check_series(rows: &[MetricRow], days: u32) -> Result<(), MetricsError> {
    if rows.len() != days as usize {
        return Err(MetricsError::InvalidSeries(format!(
            "expected {days} rows, got {}",
            rows.len()
        )));
    }

    for (idx, pair) in rows.windows(2).enumerate() {
        let (prev, next) = (pair[0].date, pair[1].date);
        if next <= prev {
            return Err(MetricsError::InvalidSeries(format!(
                "row {} ({next}) is not after row {idx} ({prev})",
                idx + 1
            )));
        }
        if prev.succ_opt() != Some(next) {
            return Err(MetricsError::InvalidSeries(format!(
                "gap between {prev} and {next}"
            )));
        }
    }

    Ok(())
}
