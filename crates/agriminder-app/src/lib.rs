//! Dashboard layer for AgriMinder
//!
//! Ties the store and the weather provider together behind `AgriContext`.

pub mod context;
pub mod dashboard;

pub use context::AgriContext;
pub use dashboard::{DashboardSummary, WeatherPanel, FALLBACK_FARMER_NAME};
