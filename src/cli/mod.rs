//! CLI command implementations.
//!
//! - `repopulse summary` — headline cards with trends and chart sparklines
//! - `repopulse series` — the daily rows behind the dashboard
//! - `repopulse watch` — interactive window switching on stdin
//! - `repopulse health` — config sources and endpoint reachability
//! - `repopulse config show|init|set|reset` — configuration management

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::config::{self, RepopulseConfig};
use crate::dashboard::{ChartData, ChartKind, Dashboard, DashboardSnapshot, DashboardView};
use crate::metrics::{DateRange, MetricRow, MetricsError, MetricsProvider, MetricsSource, SeriesSource};
use crate::stats::{self, StatCard};

/// Output format for data commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

/// Repository and window picked from flags, falling back to config.
pub struct Selection {
    pub repo: String,
    pub range: DateRange,
}

impl Selection {
    pub fn resolve(cfg: &RepopulseConfig, repo: Option<String>, range: Option<DateRange>) -> Self {
        Self {
            repo: repo.unwrap_or_else(|| cfg.source.repo.clone()),
            range: range.unwrap_or(cfg.source.default_days),
        }
    }
}

// ---------------------------------------------------------------------------
// repopulse summary
// ---------------------------------------------------------------------------

pub fn run_summary(cfg: &RepopulseConfig, selection: Selection, format: OutputFormat) -> Result<()> {
    let provider = MetricsProvider::from_config(&cfg.source);
    let series = provider.fetch(&selection.repo, selection.range);
    let view = DashboardView::build(&selection.repo, selection.range, series);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
        OutputFormat::Csv => print_cards_csv(&view.cards)?,
        OutputFormat::Table => print_summary_table(&view),
    }
    Ok(())
}

fn print_summary_table(view: &DashboardView) {
    println!(
        "{}",
        format!("Repository Analytics — {} ({})", view.repo, view.label)
            .bold()
            .cyan()
    );
    println!("{}", "=".repeat(60));
    print_cards(&view.cards);
    println!();

    println!("{}", "Charts".bold().cyan());
    for chart in &view.charts {
        print_chart_line(chart);
    }
    println!();
    print_source(&view.source);
}

fn print_cards(cards: &[StatCard]) {
    for card in cards {
        println!(
            "  {} {:>12} {}",
            format!("{:<18}", card.title).bold(),
            card.display,
            colorize_trend(card.trend)
        );
    }
}

fn print_chart_line(chart: &ChartData) {
    match chart.kind {
        ChartKind::Pie => {
            let values = chart.datasets.first().map(|d| d.values.as_slice()).unwrap_or(&[]);
            let total: u64 = values.iter().sum();
            let parts: Vec<String> = chart
                .labels
                .iter()
                .zip(values)
                .map(|(label, &days)| format!("{label} {:.0}%", pct(days, total)))
                .collect();
            println!("  {:<22} {}", chart.title, parts.join("  ").dimmed());
        }
        _ => {
            for dataset in &chart.datasets {
                let name = if chart.datasets.len() > 1 {
                    format!("{} ({})", chart.title, dataset.label)
                } else {
                    chart.title.to_string()
                };
                println!("  {:<22} {}", truncate(&name, 22), sparkline(&dataset.values));
            }
        }
    }
}

fn print_cards_csv(cards: &[StatCard]) -> Result<()> {
    write_cards_csv(cards, io::stdout().lock())
}

fn write_cards_csv<W: Write>(cards: &[StatCard], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(["title", "field", "value", "trend_pct"])?;
    for card in cards {
        writer.write_record([
            card.title.to_string(),
            card.field.to_string(),
            card.value.to_string(),
            card.trend.to_string(),
        ])?;
    }
    writer.flush().context("failed to write CSV")
}

fn print_source(source: &SeriesSource) {
    match source {
        SeriesSource::Remote => println!("  {} {}", "Source:".dimmed(), "metrics endpoint".green()),
        SeriesSource::Synthetic { reason } => println!(
            "  {} {} {}",
            "Source:".dimmed(),
            "synthetic data".yellow(),
            format!("({reason})").dimmed()
        ),
    }
}

// ---------------------------------------------------------------------------
// repopulse series
// ---------------------------------------------------------------------------

pub fn run_series(cfg: &RepopulseConfig, selection: Selection, format: OutputFormat) -> Result<()> {
    let provider = MetricsProvider::from_config(&cfg.source);
    let series = provider.fetch(&selection.repo, selection.range);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&series.rows)?),
        OutputFormat::Csv => print_rows_csv(&series.rows)?,
        OutputFormat::Table => {
            println!(
                "{}",
                format!("Daily Metrics — {} ({})", selection.repo, selection.range.label())
                    .bold()
                    .cyan()
            );
            println!("{}", "=".repeat(78));
            print_rows_table(&series.rows);
            println!();
            print_source(&series.source);
        }
    }
    Ok(())
}

fn print_rows_table(rows: &[MetricRow]) {
    println!(
        "  {:<11} {:>7} {:>6} {:>6} {:>7} {:>8} {:>8}  {}",
        "Date", "Commits", "Stars", "Forks", "Issues", "Watchers", "Size KB", "Language"
    );
    println!("  {}", "-".repeat(76));
    for (i, row) in rows.iter().enumerate() {
        let line = format!(
            "  {:<11} {:>7} {:>6} {:>6} {:>7} {:>8} {:>8}  {}",
            row.date.format("%Y-%m-%d").to_string(),
            row.commits,
            row.stars,
            row.forks,
            row.open_issues,
            row.watchers,
            row.size_kb,
            row.top_lang,
        );
        if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }
}

fn print_rows_csv(rows: &[MetricRow]) -> Result<()> {
    write_rows_csv(rows, io::stdout().lock())
}

/// Header follows the `MetricRow` field order.
fn write_rows_csv<W: Write>(rows: &[MetricRow], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().context("failed to write CSV")
}

// ---------------------------------------------------------------------------
// repopulse watch
// ---------------------------------------------------------------------------

/// Interactive view: type `7`, `14` or `30` to switch windows, `q` to quit.
///
/// Each switch starts a background fetch; a late answer for an older window
/// is dropped rather than printed.
pub fn run_watch(cfg: &RepopulseConfig, selection: Selection) -> Result<()> {
    let provider: Arc<dyn MetricsSource> = Arc::new(MetricsProvider::from_config(&cfg.source));
    let repo = selection.repo.clone();
    let dashboard = Dashboard::new(provider, selection.repo, selection.range)
        .with_listener(Arc::new(move |snap: &DashboardSnapshot| render_snapshot(&repo, snap)));

    println!(
        "{}",
        "Type 7, 14 or 30 to switch windows, q to quit.".dimmed()
    );
    println!("{}", format!("Loading {}…", selection.range.label()).dimmed());
    let _ = dashboard.select(selection.range);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed reading stdin")?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "q" | "quit" | "exit") {
            break;
        }
        match input.parse::<DateRange>() {
            Ok(range) => {
                println!("{}", format!("Loading {}…", range.label()).dimmed());
                let _ = dashboard.select(range);
            }
            Err(e) => println!("{}", e.yellow()),
        }
    }

    dashboard.close();
    Ok(())
}

fn render_snapshot(repo: &str, snap: &DashboardSnapshot) {
    let cards = stats::summary_cards(&snap.rows);
    println!();
    println!(
        "{}",
        format!("{repo} — {}", snap.selected.label()).bold().cyan()
    );
    print_cards(&cards);
    if let Some(source) = &snap.source {
        print_source(source);
    }
}

// ---------------------------------------------------------------------------
// repopulse health
// ---------------------------------------------------------------------------

pub fn run_health(cfg: &RepopulseConfig) -> Result<()> {
    println!("{}", "repopulse Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.repopulse/config.toml found"
        } else {
            "not found (run `repopulse config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".repopulse.toml found"
        } else {
            "none (optional)"
        },
    );
    print_health_item("Repository", true, &cfg.source.repo);

    let provider = MetricsProvider::from_config(&cfg.source);
    match provider.try_fetch(&cfg.source.repo, cfg.source.default_days) {
        Ok(rows) => print_health_item(
            "Metrics endpoint",
            true,
            &format!(
                "{} rows from {}",
                rows.len(),
                provider.endpoint().unwrap_or_default()
            ),
        ),
        Err(MetricsError::ConfigurationAbsent) => print_health_item(
            "Metrics endpoint",
            false,
            "not configured — serving synthetic data (set REPOPULSE_METRICS_URL)",
        ),
        Err(e) => print_health_item(
            "Metrics endpoint",
            false,
            &format!("{e} — serving synthetic data"),
        ),
    }

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<20} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// repopulse config show | init | set | reset
// ---------------------------------------------------------------------------

pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective repopulse Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    for (label, path) in [
        ("~/.repopulse/config.toml", config::global_config_file()),
        (".repopulse.toml", config::project_config_file()),
    ] {
        if path.map(|p| p.exists()).unwrap_or(false) {
            println!("  {} {}", "✓".green(), label.dimmed());
        } else {
            println!("  {} {}", "·".dimmed(), format!("{label} (not found)").dimmed());
        }
    }
    println!(
        "  {} {}",
        "·".dimmed(),
        "REPOPULSE_* environment variables".dimmed()
    );
    Ok(())
}

pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!("{} Config written to {}", "✓".green().bold(), path.display());
    Ok(())
}

pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

const SPARK_BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render values as a one-line bar sparkline scaled to the series' range.
fn sparkline(values: &[u64]) -> String {
    let (Some(&min), Some(&max)) = (values.iter().min(), values.iter().max()) else {
        return String::new();
    };
    let span = max - min;
    values
        .iter()
        .map(|&v| {
            if span == 0 {
                SPARK_BARS[3]
            } else {
                let steps = SPARK_BARS.len() as u128 - 1;
                let idx = (u128::from(v - min) * steps + u128::from(span / 2)) / u128::from(span);
                SPARK_BARS[idx as usize]
            }
        })
        .collect()
}

fn pct(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

fn colorize_trend(trend: i64) -> colored::ColoredString {
    let text = format!("{:>6}", stats::format_trend(trend));
    match trend.signum() {
        1 => text.green(),
        -1 => text.red(),
        _ => text.dimmed(),
    }
}

/// Truncate to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str_opt(Some("csv")), OutputFormat::Csv);
        assert_eq!(
            OutputFormat::from_str_opt(Some("unknown")),
            OutputFormat::Table
        );
    }

    #[test]
    fn test_sparkline() {
        assert_eq!(sparkline(&[]), "");
        assert_eq!(sparkline(&[5, 5, 5]), "▄▄▄");
        assert_eq!(sparkline(&[0, 7]), "▁█");
        assert_eq!(sparkline(&[1, 15, 8]).chars().count(), 3);
    }

    #[test]
    fn test_sparkline_wide_span() {
        assert_eq!(sparkline(&[0, u64::MAX]), "▁█");
        assert_eq!(sparkline(&[u64::MAX, 1]), "█▁");
    }

    fn csv_row(date: &str, top_lang: &str) -> MetricRow {
        MetricRow {
            date: date.parse().unwrap(),
            commits: 3,
            forks: 11,
            open_issues: 4,
            stars: 60,
            top_lang: top_lang.to_string(),
            watchers: 20,
            size_kb: 5500,
        }
    }

    #[test]
    fn test_rows_csv_quotes_labels() {
        let rows = [csv_row("2025-02-01", "C, C++"), csv_row("2025-02-02", "Go")];
        let mut out = Vec::new();
        write_rows_csv(&rows, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "date,commits,forks,open_issues,stars,top_lang,watchers,size_kb");
        assert_eq!(lines[1], "2025-02-01,3,11,4,60,\"C, C++\",20,5500");
        assert_eq!(lines[2], "2025-02-02,3,11,4,60,Go,20,5500");
    }

    #[test]
    fn test_cards_csv() {
        let rows = [csv_row("2025-02-01", "Go"), csv_row("2025-02-02", "Go")];
        let mut out = Vec::new();
        write_cards_csv(&stats::summary_cards(&rows), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "title,field,value,trend_pct");
        assert_eq!(lines[1], "Total Commits,commits,6,0");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hell…");
        assert_eq!(truncate("Issues & Watchers (Open Issues)", 22).chars().count(), 22);
    }

    #[test]
    fn test_pct() {
        assert_eq!(pct(1, 0), 0.0);
        assert!((pct(1, 4) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn selection_falls_back_to_config() {
        let mut cfg = RepopulseConfig::default();
        cfg.source.repo = "octo/demo".to_string();
        cfg.source.default_days = DateRange::Fortnight;

        let defaulted = Selection::resolve(&cfg, None, None);
        assert_eq!(defaulted.repo, "octo/demo");
        assert_eq!(defaulted.range, DateRange::Fortnight);

        let explicit = Selection::resolve(&cfg, Some("a/b".to_string()), Some(DateRange::Week));
        assert_eq!(explicit.repo, "a/b");
        assert_eq!(explicit.range, DateRange::Week);
    }
}
