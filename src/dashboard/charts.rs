/// Chart datasets derived from a metrics series.
///
/// Only the data is produced here: labels plus one or more value lists per
/// chart. Drawing is left to whichever surface consumes them.
use serde::Serialize;

use crate::metrics::{MetricField, MetricRow};
use crate::stats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Area,
    Bar,
    Pie,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub values: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartData {
    /// Stable identifier for the frontend.
    pub id: &'static str,
    pub title: &'static str,
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// Format a day as an axis label, e.g. `Jan 05`.
fn axis_label(row: &MetricRow) -> String {
    row.date.format("%b %d").to_string()
}

fn time_series(
    id: &'static str,
    title: &'static str,
    kind: ChartKind,
    series: &[MetricRow],
    fields: &[(&str, MetricField)],
) -> ChartData {
    ChartData {
        id,
        title,
        kind,
        labels: series.iter().map(axis_label).collect(),
        datasets: fields
            .iter()
            .map(|&(label, field)| Dataset {
                label: label.to_string(),
                values: series.iter().map(|row| row.value(field)).collect(),
            })
            .collect(),
    }
}

/// The six dashboard charts, in layout order.
pub fn build_charts(series: &[MetricRow]) -> Vec<ChartData> {
    let languages = stats::language_distribution(series);

    vec![
        time_series(
            "commits",
            "Commits Over Time",
            ChartKind::Line,
            series,
            &[("Commits", MetricField::Commits)],
        ),
        ChartData {
            id: "languages",
            title: "Language Distribution",
            kind: ChartKind::Pie,
            labels: languages.iter().map(|s| s.language.clone()).collect(),
            datasets: vec![Dataset {
                label: "Days".to_string(),
                values: languages.iter().map(|s| s.days).collect(),
            }],
        },
        time_series(
            "stars",
            "Stars Growth",
            ChartKind::Area,
            series,
            &[("Stars", MetricField::Stars)],
        ),
        time_series(
            "forks",
            "Repository Forks",
            ChartKind::Bar,
            series,
            &[("Forks", MetricField::Forks)],
        ),
        time_series(
            "issues_watchers",
            "Issues & Watchers",
            ChartKind::Line,
            series,
            &[
                ("Open Issues", MetricField::OpenIssues),
                ("Watchers", MetricField::Watchers),
            ],
        ),
        time_series(
            "size",
            "Repository Size",
            ChartKind::Line,
            series,
            &[("Size (KB)", MetricField::SizeKb)],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn row(date: (i32, u32, u32), lang: &str, commits: u64) -> MetricRow {
        MetricRow {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            commits,
            forks: 11,
            open_issues: 4,
            stars: 60,
            top_lang: lang.to_string(),
            watchers: 18,
            size_kb: 5200,
        }
    }

    #[test]
    fn six_charts_in_layout_order() {
        let charts = build_charts(&[]);
        let ids: Vec<_> = charts.iter().map(|c| c.id).collect();
        assert_eq!(
            ids,
            ["commits", "languages", "stars", "forks", "issues_watchers", "size"]
        );
    }

    #[test]
    fn axis_labels_use_short_month_and_day() {
        let series = vec![row((2025, 1, 5), "Go", 2), row((2025, 1, 6), "Go", 3)];
        let charts = build_charts(&series);
        assert_eq!(charts[0].labels, ["Jan 05", "Jan 06"]);
        assert_eq!(charts[0].datasets[0].values, [2, 3]);
    }

    #[test]
    fn issues_watchers_has_two_datasets() {
        let series = vec![row((2025, 1, 5), "Go", 2)];
        let chart = &build_charts(&series)[4];
        assert_eq!(chart.datasets.len(), 2);
        assert_eq!(chart.datasets[0].label, "Open Issues");
        assert_eq!(chart.datasets[1].values, [18]);
    }

    #[test]
    fn language_pie_counts_days() {
        let series = vec![
            row((2025, 1, 5), "Go", 1),
            row((2025, 1, 6), "Python", 1),
            row((2025, 1, 7), "Go", 1),
        ];
        let pie = &build_charts(&series)[1];
        assert_eq!(pie.kind, ChartKind::Pie);
        assert_eq!(pie.labels, ["Go", "Python"]);
        assert_eq!(pie.datasets[0].values, [2, 1]);
    }
}
