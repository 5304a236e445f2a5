//! Report pipeline: filter the snapshot, run every aggregator, and collect
//! the results the presentation layer needs.

use std::cmp::Ordering;

use dashboard_core::error::Result;
use dashboard_core::models::{
    CategorySales, DateRange, MissingKeyPolicy, MonthlySummary, OrderTotals, RfmRecord,
    RfmSummary,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::aggregator::OrderAggregator;
use crate::dataset::{filter, OrderDataset};

// ── Public types ──────────────────────────────────────────────────────────────

/// Everything the dashboard shows for one date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    /// The range the report was computed for.
    pub range: DateRange,
    /// Order lines inside the range.
    pub rows: usize,
    pub monthly: Vec<MonthlySummary>,
    /// All categories, best sellers first.
    pub categories: Vec<CategorySales>,
    /// `None` when the range holds no orders.
    pub rfm: Option<Vec<RfmRecord>>,
    pub totals: OrderTotals,
    pub rfm_summary: Option<RfmSummary>,
}

impl DashboardReport {
    /// `true` when no order line fell inside the range.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }
}

/// Which RFM column to rank categories by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RfmMetric {
    /// Fewest days since the last purchase first.
    Recency,
    /// Most distinct orders first.
    Frequency,
    /// Highest revenue first.
    Monetary,
}

impl RfmMetric {
    pub const ALL: [RfmMetric; 3] = [RfmMetric::Recency, RfmMetric::Frequency, RfmMetric::Monetary];

    pub fn title(self) -> &'static str {
        match self {
            RfmMetric::Recency => "By Recency (days)",
            RfmMetric::Frequency => "By Frequency",
            RfmMetric::Monetary => "By Monetary",
        }
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Filter `dataset` to `range` and derive every dashboard table.
///
/// An empty range gives empty tables and `rfm: None`; the RFM aggregator's
/// invalid-input error for that case is absorbed here. Other errors are
/// returned.
pub fn build_report(
    dataset: &OrderDataset,
    range: &DateRange,
    policy: MissingKeyPolicy,
) -> Result<DashboardReport> {
    let filtered = filter(dataset, range);
    let rows = filtered.rows();

    let monthly = OrderAggregator::monthly_orders(rows);
    let categories = OrderAggregator::category_sales(rows, policy);
    let rfm = match OrderAggregator::rfm(rows, policy) {
        Ok(records) => Some(records),
        Err(e) if e.is_invalid_input() && filtered.is_empty() => {
            debug!("RFM skipped for {}: {}", range, e);
            None
        }
        Err(e) => return Err(e),
    };

    let totals = OrderAggregator::calculate_totals(&monthly);
    let rfm_summary = rfm.as_deref().and_then(OrderAggregator::summarize_rfm);

    info!(
        "Report for {}: {} rows, {} months, {} categories, {} orders",
        range,
        rows.len(),
        monthly.len(),
        categories.len(),
        totals.total_orders
    );

    Ok(DashboardReport {
        range: *range,
        rows: rows.len(),
        monthly,
        categories,
        rfm,
        totals,
        rfm_summary,
    })
}

/// The first `n` best-selling categories.
pub fn top_categories(categories: &[CategorySales], n: usize) -> &[CategorySales] {
    &categories[..n.min(categories.len())]
}

/// The best `n` categories by `metric`. Equal values keep their input order.
pub fn rank_rfm(rfm: &[RfmRecord], metric: RfmMetric, n: usize) -> Vec<RfmRecord> {
    let mut ranked = rfm.to_vec();
    ranked.sort_by(|a, b| match metric {
        RfmMetric::Recency => a.recency.cmp(&b.recency),
        RfmMetric::Frequency => b.frequency.cmp(&a.frequency),
        RfmMetric::Monetary => b
            .monetary
            .partial_cmp(&a.monetary)
            .unwrap_or(Ordering::Equal),
    });
    ranked.truncate(n);
    ranked
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dashboard_core::models::OrderLine;
    use dashboard_core::time_utils::parse_timestamp;

    fn make_line(order: &str, category: &str, ts: &str, price: f64, qty: u64) -> OrderLine {
        OrderLine {
            order_id: order.to_string(),
            order_purchase_timestamp: parse_timestamp(ts).unwrap(),
            category: Some(category.to_string()),
            price,
            qty,
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dataset() -> OrderDataset {
        OrderDataset::new(vec![
            make_line("A", "toys", "2023-01-05 10:00:00", 10.0, 2),
            make_line("A", "toys", "2023-01-05 10:00:00", 10.0, 1),
            make_line("B", "books", "2023-02-01 09:30:00", 20.0, 1),
            make_line("C", "garden", "2023-03-20 14:00:00", 50.0, 6),
        ])
    }

    fn rfm_rows() -> Vec<RfmRecord> {
        vec![
            RfmRecord {
                category: Some("a".to_string()),
                recency: 5,
                frequency: 3,
                monetary: 10.0,
            },
            RfmRecord {
                category: Some("b".to_string()),
                recency: 0,
                frequency: 1,
                monetary: 90.0,
            },
            RfmRecord {
                category: Some("c".to_string()),
                recency: 5,
                frequency: 7,
                monetary: 40.0,
            },
        ]
    }

    #[test]
    fn test_build_report_full_range() {
        let ds = dataset();
        let range = ds.full_range().unwrap();
        let report = build_report(&ds, &range, MissingKeyPolicy::RetainMissing).unwrap();

        assert_eq!(report.rows, 4);
        assert_eq!(report.monthly.len(), 3);
        assert_eq!(report.categories[0].category.as_deref(), Some("garden"));
        assert_eq!(report.totals.total_orders, 3);
        assert!((report.totals.total_revenue - 90.0).abs() < 1e-9);

        let rfm = report.rfm.as_ref().unwrap();
        assert_eq!(rfm.len(), 3);
        let summary = report.rfm_summary.as_ref().unwrap();
        assert!((summary.avg_frequency - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_build_report_recency_anchored_to_filtered_range() {
        let ds = dataset();
        let range = DateRange::new(date("2023-01-01"), date("2023-02-28")).unwrap();
        let report = build_report(&ds, &range, MissingKeyPolicy::RetainMissing).unwrap();

        let rfm = report.rfm.unwrap();
        let toys = rfm.iter().find(|r| r.category.as_deref() == Some("toys")).unwrap();
        let books = rfm.iter().find(|r| r.category.as_deref() == Some("books")).unwrap();
        assert_eq!(toys.recency, 27);
        assert_eq!(books.recency, 0);
    }

    #[test]
    fn test_build_report_empty_range() {
        let ds = dataset();
        let range = DateRange::new(date("2022-01-01"), date("2022-12-31")).unwrap();
        let report = build_report(&ds, &range, MissingKeyPolicy::RetainMissing).unwrap();

        assert!(report.is_empty());
        assert!(report.monthly.is_empty());
        assert!(report.categories.is_empty());
        assert!(report.rfm.is_none());
        assert!(report.rfm_summary.is_none());
        assert_eq!(report.totals, OrderTotals::default());
    }

    #[test]
    fn test_build_report_drop_missing_with_only_uncategorised_rows() {
        let uncategorised = |order: &str, ts: &str| OrderLine {
            category: None,
            ..make_line(order, "unused", ts, 4.0, 3)
        };
        let ds = OrderDataset::new(vec![
            uncategorised("X", "2023-05-02 12:00:00"),
            uncategorised("Y", "2023-05-09 08:00:00"),
        ]);
        let range = ds.full_range().unwrap();
        let report = build_report(&ds, &range, MissingKeyPolicy::DropMissing).unwrap();

        assert_eq!(report.rows, 2);
        assert_eq!(report.totals.total_orders, 2);
        assert!(report.categories.is_empty());
        assert_eq!(report.rfm, Some(vec![]));
        assert!(report.rfm_summary.is_none());
        assert!(!report.is_empty());
    }

    #[test]
    fn test_build_report_leaves_dataset_untouched() {
        let ds = dataset();
        let before = ds.clone();
        let range = DateRange::new(date("2023-02-01"), date("2023-02-01")).unwrap();
        build_report(&ds, &range, MissingKeyPolicy::RetainMissing).unwrap();
        assert_eq!(ds, before);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let ds = dataset();
        let range = ds.full_range().unwrap();
        let report = build_report(&ds, &range, MissingKeyPolicy::RetainMissing).unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["monthly"][0]["month"], "2023-01");
        assert_eq!(json["range"]["start"], "2023-01-05");
        assert_eq!(json["totals"]["total_orders"], 3);
    }

    #[test]
    fn test_top_categories_truncates() {
        let ds = dataset();
        let report =
            build_report(&ds, &ds.full_range().unwrap(), MissingKeyPolicy::RetainMissing).unwrap();
        assert_eq!(top_categories(&report.categories, 2).len(), 2);
        assert_eq!(top_categories(&report.categories, 10).len(), 3);
        assert!(top_categories(&[], 10).is_empty());
    }

    #[test]
    fn test_rank_rfm_by_recency_ascending() {
        let ranked = rank_rfm(&rfm_rows(), RfmMetric::Recency, 5);
        let keys: Vec<&str> = ranked.iter().filter_map(|r| r.category.as_deref()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_rank_rfm_by_frequency_descending() {
        let ranked = rank_rfm(&rfm_rows(), RfmMetric::Frequency, 2);
        let keys: Vec<&str> = ranked.iter().filter_map(|r| r.category.as_deref()).collect();
        assert_eq!(keys, vec!["c", "a"]);
    }

    #[test]
    fn test_rank_rfm_by_monetary_descending() {
        let ranked = rank_rfm(&rfm_rows(), RfmMetric::Monetary, 1);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].category.as_deref(), Some("b"));
    }
}
