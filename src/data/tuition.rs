//! Tuition Series Filter
//! Selects the 4-year, inflation-adjusted, all-institutions tuition series.

use super::loader::{require_columns, text_values, LoaderError};
use super::normalize::parse_decorated_number;
use super::roi::DEGREE_YEARS;
use polars::prelude::*;
use serde::Serialize;
use tracing::warn;

/// `tuition_type` value of the constant-dollar 4-year series.
pub const FOUR_YEAR_CONSTANT: &str = "4 Year Constant";
/// `type` value covering public and private institutions together.
pub const ALL_INSTITUTIONS: &str = "All Institutions";

pub const COL_TYPE: &str = "type";
pub const COL_YEAR: &str = "year";
pub const COL_TUITION_TYPE: &str = "tuition_type";
pub const COL_TUITION_COST: &str = "tuition_cost";
pub const COL_YEAR_NUMERIC: &str = "year_numeric";

/// One academic year of the filtered series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TuitionYearPoint {
    pub institution_type: String,
    pub year: String,
    pub tuition_type: String,
    pub tuition_cost: f64,
    pub year_numeric: i32,
}

/// Keep only the 4-year constant-dollar rows for all institutions.
///
/// The output keeps every input column, so filtering an already filtered
/// frame returns it unchanged.
pub fn filter_four_year_constant(df: &DataFrame) -> Result<DataFrame, LoaderError> {
    require_columns(df, "tuition", &[COL_TUITION_TYPE, COL_TYPE])?;

    let filtered = df
        .clone()
        .lazy()
        .filter(
            col(COL_TUITION_TYPE)
                .eq(lit(FOUR_YEAR_CONSTANT))
                .and(col(COL_TYPE).eq(lit(ALL_INSTITUTIONS))),
        )
        .collect()?;
    Ok(filtered)
}

/// Start year of an academic-year label such as "1985-86".
pub fn parse_start_year(label: &str) -> Option<i32> {
    let prefix = label.trim().get(..4)?;
    if !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    prefix.parse().ok()
}

/// The filtered tuition series, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TuitionSeries {
    points: Vec<TuitionYearPoint>,
}

impl TuitionSeries {
    pub fn new(points: Vec<TuitionYearPoint>) -> Self {
        Self { points }
    }

    /// Build the series from a text frame that has already been filtered.
    ///
    /// Rows whose year label or cost cannot be parsed are skipped.
    pub fn from_frame(df: &DataFrame) -> Result<Self, LoaderError> {
        require_columns(df, "tuition", &[COL_TYPE, COL_YEAR, COL_TUITION_TYPE, COL_TUITION_COST])?;

        let types = text_values(df, COL_TYPE)?;
        let years = text_values(df, COL_YEAR)?;
        let tuition_types = text_values(df, COL_TUITION_TYPE)?;
        let costs = text_values(df, COL_TUITION_COST)?;

        let mut points = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let year_label = years[i].unwrap_or_default();
            let (Some(year_numeric), Some(tuition_cost)) = (
                parse_start_year(year_label),
                costs[i].and_then(parse_decorated_number),
            ) else {
                warn!("Skipping tuition row {} with unusable year/cost ({:?})", i, year_label);
                continue;
            };

            points.push(TuitionYearPoint {
                institution_type: types[i].unwrap_or_default().to_string(),
                year: year_label.to_string(),
                tuition_type: tuition_types[i].unwrap_or_default().to_string(),
                tuition_cost,
                year_numeric,
            });
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> &[TuitionYearPoint] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Earliest and latest year present.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let min = self.points.iter().map(|p| p.year_numeric).min()?;
        let max = self.points.iter().map(|p| p.year_numeric).max()?;
        Some((min, max))
    }

    /// First point recorded for a year.
    pub fn point_for_year(&self, year: i32) -> Option<&TuitionYearPoint> {
        self.points.iter().find(|p| p.year_numeric == year)
    }

    /// Point of the most recent year.
    pub fn latest(&self) -> Option<&TuitionYearPoint> {
        let (_, max) = self.year_range()?;
        self.point_for_year(max)
    }

    /// 4-year cost based on the most recent year's annual tuition.
    pub fn four_year_cost(&self) -> Option<(i32, f64)> {
        self.latest()
            .map(|p| (p.year_numeric, p.tuition_cost * DEGREE_YEARS))
    }

    /// Flat frame for `processed_tuition_trend.csv`.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let types: Vec<&str> = self.points.iter().map(|p| p.institution_type.as_str()).collect();
        let years: Vec<&str> = self.points.iter().map(|p| p.year.as_str()).collect();
        let tuition_types: Vec<&str> = self.points.iter().map(|p| p.tuition_type.as_str()).collect();
        let costs: Vec<f64> = self.points.iter().map(|p| p.tuition_cost).collect();
        let year_numeric: Vec<i32> = self.points.iter().map(|p| p.year_numeric).collect();

        DataFrame::new(vec![
            Column::new(COL_TYPE.into(), types),
            Column::new(COL_YEAR.into(), years),
            Column::new(COL_TUITION_TYPE.into(), tuition_types),
            Column::new(COL_TUITION_COST.into(), costs),
            Column::new(COL_YEAR_NUMERIC.into(), year_numeric),
        ])
    }
}
