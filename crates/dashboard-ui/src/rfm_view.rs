//! "Best Categories by RFM" section: average recency, frequency and
//! monetary value, then the top categories ranked by each.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use dashboard_core::models::{category_label, RfmRecord, RfmSummary};
use dashboard_data::analysis::{rank_rfm, DashboardReport, RfmMetric};

use crate::app::DisplayOptions;
use crate::components::bars::{BarItem, HorizontalBars};
use crate::components::metric::{render_metrics, Metric, METRIC_ROW_HEIGHT};
use crate::table_view;
use crate::themes::Theme;

/// Shown when every order in range lacks a category and those are dropped.
pub const NO_CATEGORISED_ORDERS: &str = "No categorised orders in the selected date range";

pub fn rfm_metrics(summary: &RfmSummary, options: &DisplayOptions) -> Vec<Metric> {
    vec![
        Metric::new(
            "Average Recency (days)",
            options.number(summary.avg_recency, 1),
        ),
        Metric::new("Average Frequency", options.number(summary.avg_frequency, 2)),
        Metric::new("Average Monetary", options.money(summary.avg_monetary)),
    ]
}

/// Bars for the best `options.top_rfm` categories by `metric`.
pub fn rfm_bars(rfm: &[RfmRecord], metric: RfmMetric, options: &DisplayOptions) -> Vec<BarItem> {
    rank_rfm(rfm, metric, options.top_rfm)
        .iter()
        .map(|r| {
            let (value, display) = match metric {
                RfmMetric::Recency => (r.recency as f64, options.number(r.recency as f64, 0)),
                RfmMetric::Frequency => {
                    (r.frequency as f64, options.number(r.frequency as f64, 0))
                }
                RfmMetric::Monetary => (r.monetary, options.money(r.monetary)),
            };
            BarItem::new(category_label(&r.category), value, display)
        })
        .collect()
}

pub fn render_rfm_view(
    frame: &mut Frame,
    area: Rect,
    report: &DashboardReport,
    options: &DisplayOptions,
    theme: &Theme,
) {
    let title = "Best Categories by RFM";
    let Some(rfm) = report.rfm.as_deref() else {
        table_view::render_no_data(frame, area, title, theme);
        return;
    };
    let Some(summary) = report.rfm_summary.as_ref() else {
        table_view::render_message(frame, area, title, NO_CATEGORISED_ORDERS, theme);
        return;
    };

    let [metrics_area, charts_area] =
        Layout::vertical([Constraint::Length(METRIC_ROW_HEIGHT), Constraint::Min(3)]).areas(area);
    render_metrics(frame, metrics_area, &rfm_metrics(summary, options), theme);

    let columns = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(charts_area);
    for (metric, column) in RfmMetric::ALL.iter().zip(columns.iter()) {
        let items = rfm_bars(rfm, *metric, options);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.table_border)
            .title(Span::styled(format!(" {} ", metric.title()), theme.header));
        let inner = block.inner(*column);
        let lines = HorizontalBars::new(&items, theme)
            .fit_width(inner.width)
            .to_lines();
        frame.render_widget(Paragraph::new(Text::from(lines)).block(block), *column);
    }
}
