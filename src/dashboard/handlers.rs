//! Dashboard API handlers
//!
//! Every view is computed from the shared tables on request. Empty or
//! unknown selections produce empty charts, never errors.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use super::AppState;
use crate::charts::{CategoryOptions, ChartId, ChartRenderer, ChartSpec, KeyStats, DEFAULT_CATEGORY};

pub const DEFAULT_IMAGE_WIDTH: u32 = 900;
pub const DEFAULT_IMAGE_HEIGHT: u32 = 500;
const MIN_IMAGE_SIDE: u32 = 200;
const MAX_IMAGE_SIDE: u32 = 2000;

/// Query parameters for chart endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ChartQuery {
    /// Category label; defaults to the preselected category
    pub category: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ChartQuery {
    fn category(&self) -> &str {
        self.category.as_deref().unwrap_or(DEFAULT_CATEGORY.label())
    }

    fn size(&self) -> (u32, u32) {
        let clamp = |v: Option<u32>, default: u32| v.unwrap_or(default).clamp(MIN_IMAGE_SIDE, MAX_IMAGE_SIDE);
        (clamp(self.width, DEFAULT_IMAGE_WIDTH), clamp(self.height, DEFAULT_IMAGE_HEIGHT))
    }
}

/// Dashboard API errors
#[derive(Debug)]
pub enum ApiError {
    UnknownChart(String),
    Render(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::UnknownChart(slug) => (StatusCode::NOT_FOUND, format!("Unknown chart: {}", slug)),
            ApiError::Render(msg) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Render error: {}", msg)),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

fn chart_id(slug: &str) -> Result<ChartId, ApiError> {
    ChartId::from_slug(slug).ok_or_else(|| ApiError::UnknownChart(slug.to_string()))
}

/// GET /api/categories
pub async fn get_categories(State(state): State<AppState>) -> Json<CategoryOptions> {
    Json(state.data.categories())
}

/// GET /api/summary
pub async fn get_summary(State(state): State<AppState>) -> Json<KeyStats> {
    Json(state.data.key_stats())
}

/// GET /api/charts/:chart
pub async fn get_chart(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<ChartQuery>,
) -> Result<Json<ChartSpec>, ApiError> {
    let id = chart_id(&slug)?;
    debug!("Chart {} for category '{}'", slug, query.category());
    Ok(Json(state.data.chart(id, query.category())))
}

/// GET /api/images/:chart
///
/// Renders on the blocking pool; drawing is CPU-bound.
pub async fn get_chart_image(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<ChartQuery>,
) -> Result<Response, ApiError> {
    let id = chart_id(&slug)?;
    let spec = state.data.chart(id, query.category());
    let (width, height) = query.size();

    let png = tokio::task::spawn_blocking(move || ChartRenderer::render_png(&spec, width, height))
        .await
        .map_err(|e| ApiError::Render(e.to_string()))?
        .map_err(|e| {
            error!("Failed to render {}: {}", slug, e);
            ApiError::Render(e.to_string())
        })?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png).into_response())
}
