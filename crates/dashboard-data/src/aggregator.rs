//! Order-line aggregation: monthly trend, category sales and RFM scores.
//!
//! Every function here is a pure transform of the rows it is given. Callers
//! filter first; nothing is cached between calls.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDateTime;
use dashboard_core::error::{DashboardError, Result};
use dashboard_core::formatting::round_to;
use dashboard_core::models::{
    CategorySales, MissingKeyPolicy, MonthlySummary, OrderLine, OrderTotals, RfmRecord,
    RfmSummary,
};
use dashboard_core::time_utils::{days_between, month_key};

// ── Buckets ───────────────────────────────────────────────────────────────────

/// Running totals for one calendar month.
#[derive(Debug, Default)]
struct MonthBucket<'a> {
    orders: HashSet<&'a str>,
    revenue: f64,
}

impl<'a> MonthBucket<'a> {
    fn add_row(&mut self, row: &'a OrderLine) {
        self.orders.insert(row.order_id.as_str());
        self.revenue += row.price;
    }
}

/// Running totals for one product category.
#[derive(Debug)]
struct CategoryBucket<'a> {
    last_purchase: NaiveDateTime,
    orders: HashSet<&'a str>,
    monetary: f64,
}

impl<'a> CategoryBucket<'a> {
    fn new(first_seen: NaiveDateTime) -> Self {
        Self {
            last_purchase: first_seen,
            orders: HashSet::new(),
            monetary: 0.0,
        }
    }

    fn add_row(&mut self, row: &'a OrderLine) {
        self.last_purchase = self.last_purchase.max(row.order_purchase_timestamp);
        self.orders.insert(row.order_id.as_str());
        self.monetary += row.price;
    }
}

// ── OrderAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that rolls order lines up into the dashboard tables.
pub struct OrderAggregator;

impl OrderAggregator {
    /// One row per calendar month present in `rows`, ascending.
    ///
    /// `order_count` counts distinct order ids; `revenue` sums every line's
    /// price, so a multi-line order contributes once per line. Months without
    /// rows are omitted.
    pub fn monthly_orders(rows: &[OrderLine]) -> Vec<MonthlySummary> {
        // "%Y-%m" keys sort chronologically.
        let mut map: BTreeMap<String, MonthBucket> = BTreeMap::new();

        for row in rows {
            map.entry(month_key(&row.order_purchase_timestamp))
                .or_default()
                .add_row(row);
        }

        map.into_iter()
            .map(|(month, bucket)| MonthlySummary {
                month,
                order_count: bucket.orders.len() as u64,
                revenue: bucket.revenue,
            })
            .collect()
    }

    /// Total quantity per category, largest first.
    ///
    /// Not truncated. Equal quantities keep ascending category order, with
    /// the missing-category group (when retained) ahead of named ones.
    pub fn category_sales(rows: &[OrderLine], policy: MissingKeyPolicy) -> Vec<CategorySales> {
        let mut map: BTreeMap<Option<&str>, u64> = BTreeMap::new();

        for row in rows.iter().filter(|r| policy.admits(&r.category)) {
            *map.entry(row.category.as_deref()).or_insert(0) += row.qty;
        }

        let mut sales: Vec<CategorySales> = map
            .into_iter()
            .map(|(category, quantity)| CategorySales {
                category: category.map(str::to_string),
                quantity,
            })
            .collect();

        // `sort_by` is stable.
        sales.sort_by(|a, b| b.quantity.cmp(&a.quantity));
        sales
    }

    /// Recency / frequency / monetary per category, ordered by category.
    ///
    /// Recency is measured against the latest timestamp across all of `rows`
    /// (including rows the policy leaves out of the grouping), with both
    /// sides truncated to the calendar date.
    ///
    /// Fails with [`DashboardError::InvalidInput`] when `rows` is empty,
    /// since there is no anchor date to measure from.
    pub fn rfm(rows: &[OrderLine], policy: MissingKeyPolicy) -> Result<Vec<RfmRecord>> {
        let anchor = rows
            .iter()
            .map(|r| r.order_purchase_timestamp)
            .max()
            .ok_or_else(|| {
                DashboardError::InvalidInput(
                    "no orders in the selected date range; RFM needs at least one".to_string(),
                )
            })?;

        let mut map: BTreeMap<Option<&str>, CategoryBucket> = BTreeMap::new();

        for row in rows.iter().filter(|r| policy.admits(&r.category)) {
            map.entry(row.category.as_deref())
                .or_insert_with(|| CategoryBucket::new(row.order_purchase_timestamp))
                .add_row(row);
        }

        Ok(map
            .into_iter()
            .map(|(category, bucket)| RfmRecord {
                category: category.map(str::to_string),
                recency: days_between(&anchor, &bucket.last_purchase),
                frequency: bucket.orders.len() as u64,
                monetary: bucket.monetary,
            })
            .collect())
    }

    /// Sum the monthly rows into headline totals.
    pub fn calculate_totals(monthly: &[MonthlySummary]) -> OrderTotals {
        let mut totals = OrderTotals::default();
        for month in monthly {
            totals.total_orders += month.order_count;
            totals.total_revenue += month.revenue;
            totals.months += 1;
        }
        totals
    }

    /// Mean recency (1 dp), frequency (2 dp) and monetary value across the
    /// RFM rows. `None` when there are no rows.
    pub fn summarize_rfm(rfm: &[RfmRecord]) -> Option<RfmSummary> {
        if rfm.is_empty() {
            return None;
        }
        let n = rfm.len() as f64;
        let recency: f64 = rfm.iter().map(|r| r.recency as f64).sum();
        let frequency: f64 = rfm.iter().map(|r| r.frequency as f64).sum();
        let monetary: f64 = rfm.iter().map(|r| r.monetary).sum();

        Some(RfmSummary {
            avg_recency: round_to(recency / n, 1),
            avg_frequency: round_to(frequency / n, 2),
            avg_monetary: monetary / n,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
