//! Shared domain types for the sales dashboard.
//!
//! Order-line and summary records, the error type, timestamp helpers, number
//! and currency formatting, and CLI settings.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{DashboardError, Result};
