//! "Monthly Orders" section: headline totals, the order-count and revenue
//! trend lines, and the month-by-month table.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use dashboard_core::models::MonthlySummary;
use dashboard_data::analysis::DashboardReport;

use crate::app::DisplayOptions;
use crate::components::metric::{render_metrics, Metric, METRIC_ROW_HEIGHT};
use crate::table_view;
use crate::themes::Theme;

/// `(month index, value)` points for one monthly series.
pub fn series_points(
    monthly: &[MonthlySummary],
    value: impl Fn(&MonthlySummary) -> f64,
) -> Vec<(f64, f64)> {
    monthly
        .iter()
        .enumerate()
        .map(|(i, m)| (i as f64, value(m)))
        .collect()
}

/// Upper y bound with 10% headroom; `1.0` for an all-zero series.
pub fn y_upper_bound(points: &[(f64, f64)]) -> f64 {
    let max = points.iter().map(|p| p.1).fold(0.0_f64, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

/// First, middle and last month labels (deduplicated for short series).
pub fn x_labels(monthly: &[MonthlySummary]) -> Vec<String> {
    let mut labels: Vec<String> = Vec::with_capacity(3);
    if monthly.is_empty() {
        return labels;
    }
    for idx in [0, monthly.len() / 2, monthly.len() - 1] {
        let label = &monthly[idx].month;
        if labels.last() != Some(label) {
            labels.push(label.clone());
        }
    }
    labels
}

/// Metric cards shown above the trend charts.
pub fn trend_metrics(report: &DashboardReport, options: &DisplayOptions) -> Vec<Metric> {
    vec![
        Metric::new(
            "Total orders",
            options.number(report.totals.total_orders as f64, 0),
        ),
        Metric::new("Total Revenue", options.money(report.totals.total_revenue)),
    ]
}

pub fn render_trend_view(
    frame: &mut Frame,
    area: Rect,
    report: &DashboardReport,
    options: &DisplayOptions,
    theme: &Theme,
) {
    if report.monthly.is_empty() {
        table_view::render_no_data(frame, area, "Monthly Orders", theme);
        return;
    }

    // Header row, months, totals row and borders.
    let table_height = (report.monthly.len() as u16).saturating_add(4).min(area.height / 3);
    let [metrics_area, charts_area, table_area] = Layout::vertical([
        Constraint::Length(METRIC_ROW_HEIGHT),
        Constraint::Min(8),
        Constraint::Length(table_height),
    ])
    .areas(area);

    render_metrics(frame, metrics_area, &trend_metrics(report, options), theme);

    let [orders_area, revenue_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
            .areas(charts_area);

    let orders = series_points(&report.monthly, |m| m.order_count as f64);
    let revenue = series_points(&report.monthly, |m| m.revenue);
    let labels = x_labels(&report.monthly);

    render_line_chart(
        frame,
        orders_area,
        " Orders per month ",
        &orders,
        &labels,
        options.number(y_upper_bound(&orders), 0),
        theme,
    );
    render_line_chart(
        frame,
        revenue_area,
        " Revenue per month ",
        &revenue,
        &labels,
        options.money(y_upper_bound(&revenue)),
        theme,
    );

    table_view::render_monthly_table(
        frame,
        table_area,
        &report.monthly,
        &report.totals,
        options,
        theme,
    );
}

fn render_line_chart(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    points: &[(f64, f64)],
    labels: &[String],
    y_max_label: String,
    theme: &Theme,
) {
    let x_max = (points.len().saturating_sub(1) as f64).max(1.0);
    let dataset = Dataset::default()
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(theme.chart_line)
        .data(points);

    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.table_border)
                .title(Span::styled(title.to_string(), theme.header)),
        )
        .x_axis(
            Axis::default()
                .style(theme.chart_axis)
                .bounds([0.0, x_max])
                .labels(labels.iter().cloned()),
        )
        .y_axis(
            Axis::default()
                .style(theme.chart_axis)
                .bounds([0.0, y_upper_bound(points)])
                .labels(["0".to_string(), y_max_label]),
        );

    frame.render_widget(chart, area);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
