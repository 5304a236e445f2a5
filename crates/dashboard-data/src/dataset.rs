//! Immutable order-line snapshot and the date filter over it.

use chrono::NaiveDateTime;
use dashboard_core::models::{DateRange, OrderLine};
use tracing::debug;

/// A loaded set of order lines, sorted by purchase timestamp ascending.
///
/// Never mutated after construction; filtering yields a new snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderDataset {
    rows: Vec<OrderLine>,
}

impl OrderDataset {
    /// Wrap `rows`, sorting them by timestamp (stable, so equal timestamps
    /// keep their source order).
    pub fn new(mut rows: Vec<OrderLine>) -> Self {
        rows.sort_by_key(|r| r.order_purchase_timestamp);
        Self { rows }
    }

    pub fn rows(&self) -> &[OrderLine] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Earliest purchase timestamp, `None` when empty.
    pub fn min_timestamp(&self) -> Option<NaiveDateTime> {
        self.rows.first().map(|r| r.order_purchase_timestamp)
    }

    /// Latest purchase timestamp, `None` when empty.
    pub fn max_timestamp(&self) -> Option<NaiveDateTime> {
        self.rows.last().map(|r| r.order_purchase_timestamp)
    }

    /// The range spanning the first to the last order date. This is the
    /// default filter and the limit for user-selected ranges.
    pub fn full_range(&self) -> Option<DateRange> {
        let start = self.min_timestamp()?.date();
        let end = self.max_timestamp()?.date();
        DateRange::new(start, end).ok()
    }
}

/// Rows of `dataset` whose purchase date falls inside `range`, as a new
/// snapshot. The source is left untouched.
pub fn filter(dataset: &OrderDataset, range: &DateRange) -> OrderDataset {
    let rows: Vec<OrderLine> = dataset
        .rows
        .iter()
        .filter(|r| range.contains(&r.order_purchase_timestamp))
        .cloned()
        .collect();

    debug!(
        "filter {}: kept {} of {} rows",
        range,
        rows.len(),
        dataset.len()
    );

    // Already ordered; skip the re-sort in `new`.
    OrderDataset { rows }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dashboard_core::time_utils::parse_timestamp;

    fn line(order: &str, ts: &str) -> OrderLine {
        OrderLine {
            order_id: order.to_string(),
            order_purchase_timestamp: parse_timestamp(ts).unwrap(),
            category: Some("toys".to_string()),
            price: 1.0,
            qty: 1,
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample() -> OrderDataset {
        OrderDataset::new(vec![
            line("C", "2023-03-10 12:00:00"),
            line("A", "2023-01-05 08:00:00"),
            line("B", "2023-02-01 23:59:59"),
            line("D", "2023-02-02 00:00:00"),
        ])
    }

    #[test]
    fn test_new_sorts_by_timestamp() {
        let ds = sample();
        let ids: Vec<&str> = ds.rows().iter().map(|r| r.order_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B", "D", "C"]);
    }

    #[test]
    fn test_min_max_and_full_range() {
        let ds = sample();
        assert_eq!(ds.min_timestamp(), parse_timestamp("2023-01-05 08:00:00"));
        assert_eq!(ds.max_timestamp(), parse_timestamp("2023-03-10 12:00:00"));
        let range = ds.full_range().unwrap();
        assert_eq!(range.start(), date("2023-01-05"));
        assert_eq!(range.end(), date("2023-03-10"));
    }

    #[test]
    fn test_empty_dataset_has_no_range() {
        let ds = OrderDataset::default();
        assert!(ds.is_empty());
        assert!(ds.min_timestamp().is_none());
        assert!(ds.full_range().is_none());
    }

    #[test]
    fn test_filter_full_range_keeps_everything() {
        let ds = sample();
        let range = ds.full_range().unwrap();
        assert_eq!(filter(&ds, &range), ds);
    }

    #[test]
    fn test_filter_includes_whole_end_day() {
        let ds = sample();
        let range = DateRange::new(date("2023-02-01"), date("2023-02-01")).unwrap();
        let filtered = filter(&ds, &range);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.rows()[0].order_id, "B");
    }

    #[test]
    fn test_filter_does_not_mutate_source() {
        let ds = sample();
        let before = ds.clone();
        let range = DateRange::new(date("2023-02-01"), date("2023-02-28")).unwrap();
        let filtered = filter(&ds, &range);
        assert_eq!(filtered.len(), 2);
        assert_eq!(ds, before);
    }

    #[test]
    fn test_filter_can_yield_empty_snapshot() {
        let ds = sample();
        let range = DateRange::new(date("2022-01-01"), date("2022-12-31")).unwrap();
        let filtered = filter(&ds, &range);
        assert!(filtered.is_empty());
        assert!(filtered.full_range().is_none());
    }
}
