//! Dashboard module
//!
//! Provides the overview page showing the period's KPI totals and the
//! expenses-by-category chart.

mod charts;
mod handlers;
mod tables;

pub use handlers::get_dashboard_page;
