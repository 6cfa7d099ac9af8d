//! Overview tab: headline metrics and the daily orders chart.

use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    symbols,
    text::{Line, Span, Text},
    widgets::{Axis, Block, Borders, Chart, Dataset as ChartDataset, GraphType, Paragraph},
    Frame,
};

use dashboard_core::formatting::{format_count, format_currency, Currency};
use dashboard_core::models::DailyRollup;
use dashboard_data::snapshot::DashboardSnapshot;

use crate::themes::Theme;

const LABEL_WIDTH: usize = 22;

// ── Metrics ───────────────────────────────────────────────────────────────────

fn metric_line<'a>(label: &str, value: String, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<width$}", label, width = LABEL_WIDTH), theme.label),
        Span::styled(value, theme.value),
    ])
}

/// Headline metric lines for `snapshot`.
pub fn build_metric_lines<'a>(
    snapshot: &DashboardSnapshot,
    currency: Currency,
    theme: &Theme,
) -> Vec<Line<'a>> {
    let totals = &snapshot.totals;
    let average = if totals.total_orders > 0 {
        totals.total_revenue / totals.total_orders as f64
    } else {
        0.0
    };

    vec![
        metric_line("Total orders", format_count(totals.total_orders, currency), theme),
        metric_line("Total revenue", format_currency(totals.total_revenue, currency), theme),
        metric_line("Average order value", format_currency(average, currency), theme),
        metric_line("Days with sales", format_count(totals.days as u64, currency), theme),
        metric_line("Order items", format_count(snapshot.rows as u64, currency), theme),
    ]
}

// ── Chart ─────────────────────────────────────────────────────────────────────

/// `(days since first rollup, order_count)` points, spaced by calendar day.
pub fn chart_points(daily: &[DailyRollup]) -> Vec<(f64, f64)> {
    let Some(first) = daily.first().map(|d| d.day) else {
        return Vec::new();
    };
    daily
        .iter()
        .map(|d| ((d.day - first).num_days() as f64, d.order_count as f64))
        .collect()
}

/// Y-axis upper bound with a little headroom above the busiest day.
pub fn y_upper_bound(daily: &[DailyRollup]) -> f64 {
    let max = daily.iter().map(|d| d.order_count).max().unwrap_or(0);
    (max + (max / 10).max(1)) as f64
}

fn day_label(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

fn render_daily_chart(frame: &mut Frame, area: Rect, daily: &[DailyRollup], theme: &Theme) {
    let points = chart_points(daily);
    let x_max = points.last().map(|p| p.0).unwrap_or(0.0).max(1.0);
    let y_max = y_upper_bound(daily);

    let x_labels: Vec<String> = match (daily.first(), daily.last()) {
        (Some(first), Some(last)) => vec![day_label(first.day), day_label(last.day)],
        _ => Vec::new(),
    };
    let y_labels = vec![
        "0".to_string(),
        format!("{}", (y_max / 2.0).round()),
        format!("{}", y_max),
    ];

    let series = ChartDataset::default()
        .name("orders")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.chart_series)
        .data(&points);

    let chart = Chart::new(vec![series])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(" Daily orders "),
        )
        .x_axis(
            Axis::default()
                .style(theme.chart_axis)
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(theme.chart_axis)
                .bounds([0.0, y_max])
                .labels(y_labels),
        );

    frame.render_widget(chart, area);
}

// ── Main render ───────────────────────────────────────────────────────────────

/// Render the Overview tab into `area`.
pub fn render_overview(
    frame: &mut Frame,
    area: Rect,
    snapshot: &DashboardSnapshot,
    currency: Currency,
    theme: &Theme,
) {
    let metrics = build_metric_lines(snapshot, currency, theme);
    let chunks = Layout::vertical([
        Constraint::Length(metrics.len() as u16 + 2),
        Constraint::Min(6),
    ])
    .split(area);

    frame.render_widget(
        Paragraph::new(Text::from(metrics)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(" Metrics "),
        ),
        chunks[0],
    );
    render_daily_chart(frame, chunks[1], &snapshot.daily, theme);
}

// ── Tests ──────────────────────────────────────────────────────────────────────
