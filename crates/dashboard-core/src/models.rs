use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{DashboardError, Result};

/// Label shown for rows whose product category is missing.
pub const MISSING_CATEGORY_LABEL: &str = "unknown";

/// A single order line read from the dataset: one row per (order, product)
/// pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Order identifier. Not unique per row; an order may span several lines.
    pub order_id: String,
    /// When the order was placed.
    pub order_purchase_timestamp: NaiveDateTime,
    /// Product category label, `None` when the source cell was empty.
    #[serde(default)]
    pub category: Option<String>,
    /// Line price. Each line contributes its own price to revenue.
    pub price: f64,
    /// Quantity of the item purchased.
    pub qty: u64,
}

impl OrderLine {
    /// Display label for this line's category.
    pub fn category_label(&self) -> &str {
        category_label(&self.category)
    }
}

/// Display label for an optional category key.
pub fn category_label(category: &Option<String>) -> &str {
    category.as_deref().unwrap_or(MISSING_CATEGORY_LABEL)
}

/// Orders and revenue rolled up over one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// Month key, e.g. `"2018-03"`.
    pub month: String,
    /// Number of distinct order ids placed in the month.
    pub order_count: u64,
    /// Sum of line prices in the month.
    pub revenue: f64,
}

/// Total quantity sold for one product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySales {
    pub category: Option<String>,
    pub quantity: u64,
}

/// Recency / frequency / monetary scores for one product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RfmRecord {
    pub category: Option<String>,
    /// Whole days between the category's last purchase date and the anchor
    /// date of the filtered input. Never negative.
    pub recency: i64,
    /// Number of distinct orders containing the category.
    pub frequency: u64,
    /// Sum of line prices for the category.
    pub monetary: f64,
}

/// How grouping treats rows whose key is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MissingKeyPolicy {
    /// Rows without a key form a group of their own.
    #[default]
    #[value(name = "retain")]
    RetainMissing,
    /// Rows without a key are left out of the grouping.
    #[value(name = "drop")]
    DropMissing,
}

impl MissingKeyPolicy {
    /// Whether a row carrying `key` takes part in the grouping.
    pub fn admits<T>(self, key: &Option<T>) -> bool {
        match self {
            MissingKeyPolicy::RetainMissing => true,
            MissingKeyPolicy::DropMissing => key.is_some(),
        }
    }
}

impl std::fmt::Display for MissingKeyPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingKeyPolicy::RetainMissing => write!(f, "retain"),
            MissingKeyPolicy::DropMissing => write!(f, "drop"),
        }
    }
}

/// Inclusive date range used to filter order lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range; fails when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(DashboardError::InvalidInput(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// `true` when the timestamp's calendar date lies within the range. The
    /// whole end day is included.
    pub fn contains(&self, ts: &NaiveDateTime) -> bool {
        let date = ts.date();
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Restrict this range to `bounds`, keeping `start <= end`.
    pub fn clamp_to(&self, bounds: &DateRange) -> DateRange {
        let start = self.start.clamp(bounds.start, bounds.end);
        let end = self.end.clamp(start, bounds.end);
        DateRange { start, end }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Headline order figures across all monthly rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub total_orders: u64,
    pub total_revenue: f64,
    /// Number of monthly rows summed.
    pub months: usize,
}

/// Averages across all RFM rows, rounded the way the dashboard shows them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RfmSummary {
    /// Mean recency in days, one decimal place.
    pub avg_recency: f64,
    /// Mean distinct order count, two decimal places.
    pub avg_frequency: f64,
    /// Mean monetary value, unrounded.
    pub avg_monetary: f64,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
