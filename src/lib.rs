//! College ROI - data preparation and dashboard
//!
//! `data` turns the raw salary and tuition CSVs into processed tables,
//! `stats` summarises them, `charts` builds the dashboard views and
//! `dashboard` serves them over HTTP.

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod stats;

pub use config::Settings;
pub use dashboard::{build_router, AppState};
