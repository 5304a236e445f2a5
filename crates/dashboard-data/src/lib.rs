//! Data layer for the sales dashboard.
//!
//! Loads the order-line CSV into an immutable snapshot, filters it by date
//! range and runs the monthly, category and RFM aggregations behind the
//! dashboard views.

pub mod aggregator;
pub mod analysis;
pub mod dataset;
pub mod reader;

pub use dashboard_core as core;
