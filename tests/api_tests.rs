//! Integration tests for the dashboard HTTP endpoints
//!
//! Tests cover:
//! - Health and page endpoints
//! - Category options and key stats
//! - Chart views by slug, with and without a category
//! - Unknown charts (404) and unknown categories (empty chart)

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use college_roi::charts::DashboardData;
use college_roi::data::{MajorRecord, RoiCalculator, TuitionSeries, TuitionYearPoint};
use college_roi::{build_router, AppState};
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot` method

fn record(major: &str, early: f64, mid: f64) -> MajorRecord {
    MajorRecord::derive(None, major, "Bachelors", early, mid, None, &RoiCalculator::new(104_160.0))
}

fn point(year: i32, cost: f64) -> TuitionYearPoint {
    TuitionYearPoint {
        institution_type: "All Institutions".into(),
        year: format!("{}-{:02}", year, (year + 1) % 100),
        tuition_type: "4 Year Constant".into(),
        tuition_cost: cost,
        year_numeric: year,
    }
}

/// Test helper: app over a small fixed dataset
fn setup_app() -> axum::Router {
    let records = vec![
        record("Petroleum Engineering", 94_500.0, 175_500.0),
        record("Software Engineering", 70_000.0, 120_000.0),
        record("Computer Science", 70_000.0, 118_000.0),
        record("Finance", 55_000.0, 105_000.0),
        record("Art History", 35_000.0, 60_000.0),
    ];
    let tuition = TuitionSeries::new(vec![point(1985, 12_000.0), point(2015, 26_040.0)]);
    build_router(AppState::new(DashboardData::new(records, tuition)))
}

fn test_request(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app.oneshot(test_request(uri)).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    (status, serde_json::from_slice(&bytes).expect("Should parse JSON"))
}

#[tokio::test]
async fn test_health_endpoint() {
    let (status, body) = get_json(setup_app(), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "college_roi");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_index_page_is_html() {
    let response = setup_app().oneshot(test_request("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("COLLEGE ROI DASHBOARD"));
}

#[tokio::test]
async fn test_categories_sorted_with_default() {
    let (status, body) = get_json(setup_app(), "/api/categories").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["default"], "Engineering & Technology");
    let categories: Vec<&str> = body["categories"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(
        categories,
        vec!["Arts & Communications", "Business & Economics", "Engineering & Technology"]
    );
}

#[tokio::test]
async fn test_summary_key_stats() {
    let (status, body) = get_json(setup_app(), "/api/summary").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["majors_analyzed"], 5);
    assert_eq!(body["avg_four_year_cost"], 104_160.0);
    assert_eq!(body["break_even_category"], "Engineering & Technology");
    assert!(body["avg_break_even"].is_number());
}

#[tokio::test]
async fn test_tuition_trend_chart() {
    let (status, body) = get_json(setup_app(), "/api/charts/tuition-trend").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "tuition-trend");
    assert_eq!(body["kind"], "line");
    assert_eq!(body["title"], "College Tuition Trends (1985-2015)");
    assert_eq!(body["series"][0]["x"][1], 2015.0);
}

#[tokio::test]
async fn test_top_majors_uses_default_category() {
    let (status, body) = get_json(setup_app(), "/api/charts/top-majors").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "grouped_horizontal_bar");
    assert_eq!(body["series"][0]["labels"][0], "Petroleum Engineering");
    assert_eq!(body["series"][0]["values"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_top_majors_for_selected_category() {
    let (status, body) = get_json(setup_app(), "/api/charts/top-majors?category=Business%20%26%20Economics").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["series"][0]["labels"][0], "Finance");
    assert_eq!(body["series"][1]["values"][0], 105_000.0);
}

#[tokio::test]
async fn test_unknown_category_is_empty_not_error() {
    let (status, body) = get_json(setup_app(), "/api/charts/top-majors?category=Astrology").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["series"][0]["values"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_break_even_without_data() {
    let (status, body) =
        get_json(setup_app(), "/api/charts/break-even?category=Arts%20%26%20Communications").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "indicator");
    assert_eq!(body["indicator"]["has_data"], false);
    assert!(body["indicator"]["value"].is_null());
}

#[tokio::test]
async fn test_fastest_break_even_excludes_never() {
    let (status, body) = get_json(setup_app(), "/api/charts/fastest-break-even").await;

    assert_eq!(status, StatusCode::OK);
    let labels = body["series"][0]["labels"].as_array().unwrap();
    assert_eq!(labels.len(), 4);
    assert!(!labels.iter().any(|l| l == "Art History"));
    assert_eq!(labels[0], "Petroleum Engineering");
}

#[tokio::test]
async fn test_unknown_chart_is_404() {
    let (status, body) = get_json(setup_app(), "/api/charts/pie").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("pie"));

    let response = setup_app().oneshot(test_request("/api/images/pie")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "requires system fonts"]
async fn test_chart_image_is_png() {
    let response = setup_app()
        .oneshot(test_request("/api/images/salary-by-category"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/png");

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}
