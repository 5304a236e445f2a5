//! Plain-text rendering of a [`DashboardReport`] for the `report` view.

use dashboard_core::models::category_label;
use dashboard_data::analysis::{top_categories, DashboardReport, RfmMetric};

use crate::app::DisplayOptions;
use crate::rfm_view::{rfm_bars, rfm_metrics, NO_CATEGORISED_ORDERS};
use crate::table_view::{monthly_cells, NO_ORDERS};
use crate::trend_view::trend_metrics;

const RULE_WIDTH: usize = 60;

/// Render every dashboard section as aligned plain text.
pub fn render_text_report(report: &DashboardReport, options: &DisplayOptions) -> String {
    let mut out: Vec<String> = Vec::with_capacity(64);
    let days = report.range.days();

    out.push("SALES DASHBOARD".to_string());
    out.push("=".repeat(RULE_WIDTH));
    out.push(format!(
        "Date range: {} ({} day{})",
        report.range,
        days,
        if days == 1 { "" } else { "s" }
    ));
    out.push(format!("Order lines: {}", options.number(report.rows as f64, 0)));

    section(&mut out, "Monthly Orders");
    if report.monthly.is_empty() {
        out.push(format!("  {NO_ORDERS}"));
    } else {
        for metric in trend_metrics(report, options) {
            out.push(format!("  {}: {}", metric.label, metric.value));
        }
        out.push(String::new());
        out.push(format!("  {:<18} {:>10} {:>16}", "Month", "Orders", "Revenue"));
        for [month, orders, revenue] in monthly_cells(&report.monthly, &report.totals, options) {
            out.push(format!("  {:<18} {:>10} {:>16}", month, orders, revenue));
        }
    }

    section(&mut out, "Top Product Categories");
    let top = top_categories(&report.categories, options.top_categories);
    if top.is_empty() {
        out.push(format!("  {NO_ORDERS}"));
    }
    for (rank, c) in top.iter().enumerate() {
        out.push(format!(
            "  {:>2}. {:<32} {:>10}",
            rank + 1,
            category_label(&c.category),
            options.number(c.quantity as f64, 0)
        ));
    }

    section(&mut out, "Best Categories by RFM");
    match (report.rfm.as_deref(), report.rfm_summary.as_ref()) {
        (Some(rfm), Some(summary)) => {
            for metric in rfm_metrics(summary, options) {
                out.push(format!("  {}: {}", metric.label, metric.value));
            }
            for metric in RfmMetric::ALL {
                out.push(String::new());
                out.push(format!("  {}", metric.title()));
                for (rank, bar) in rfm_bars(rfm, metric, options).iter().enumerate() {
                    out.push(format!(
                        "    {:>2}. {:<30} {:>14}",
                        rank + 1,
                        bar.label,
                        bar.display
                    ));
                }
            }
        }
        (Some(_), None) => out.push(format!("  {NO_CATEGORISED_ORDERS}")),
        (None, _) => out.push(format!("  {NO_ORDERS}")),
    }

    out.push(String::new());
    out.join("\n")
}

fn section(out: &mut Vec<String>, title: &str) {
    out.push(String::new());
    out.push(title.to_string());
    out.push("-".repeat(title.len()));
}
