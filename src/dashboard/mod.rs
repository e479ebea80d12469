//! Dashboard HTTP service
//!
//! Serves the page, the JSON chart views and PNG renderings of them over
//! one shared, read-only `DashboardData`.

use crate::charts::DashboardData;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod handlers;
pub mod health;
pub mod ui;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Processed tables, loaded once at startup
    pub data: Arc<DashboardData>,
}

impl AppState {
    pub fn new(data: DashboardData) -> Self {
        Self { data: Arc::new(data) }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let api = Router::new()
        .route("/api/categories", get(handlers::get_categories))
        .route("/api/summary", get(handlers::get_summary))
        .route("/api/charts/:chart", get(handlers::get_chart))
        .route("/api/images/:chart", get(handlers::get_chart_image));

    let public = Router::new()
        .route("/", get(ui::serve_index))
        .merge(health::health_routes());

    Router::new()
        .merge(api)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
