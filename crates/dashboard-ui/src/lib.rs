//! Terminal UI layer for the sales dashboard.
//!
//! Provides themes, the header, metric and bar components, the monthly,
//! category and RFM views, a plain-text report renderer and the interactive
//! application loop built on top of [`ratatui`].

pub mod app;
pub mod category_view;
pub mod components;
pub mod rfm_view;
pub mod table_view;
pub mod text_report;
pub mod themes;
pub mod trend_view;

pub use dashboard_core as core;
