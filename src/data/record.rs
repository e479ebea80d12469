//! Cleaned per-major record.

use super::category::Category;
use super::roi::{BreakEven, RoiCalculator};
use serde::Serialize;

/// One degree/major after cleaning and ROI derivation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MajorRecord {
    pub rank: Option<i64>,
    pub major: String,
    pub degree_type: String,
    pub early_career_pay: f64,
    pub mid_career_pay: f64,
    pub high_meaning_pct: Option<f64>,
    pub total_tuition_cost: f64,
    pub salary_advantage: f64,
    pub years_to_break_even: BreakEven,
    pub lifetime_advantage: f64,
    pub category: Category,
}

impl MajorRecord {
    /// Derive a full record from the cleaned survey fields.
    pub fn derive(
        rank: Option<i64>,
        major: impl Into<String>,
        degree_type: impl Into<String>,
        early_career_pay: f64,
        mid_career_pay: f64,
        high_meaning_pct: Option<f64>,
        calculator: &RoiCalculator,
    ) -> Self {
        let major = major.into();
        let metrics = calculator.evaluate(early_career_pay, mid_career_pay);
        let category = Category::classify(&major);

        Self {
            rank,
            major,
            degree_type: degree_type.into(),
            early_career_pay,
            mid_career_pay,
            high_meaning_pct,
            total_tuition_cost: calculator.total_tuition_cost(),
            salary_advantage: metrics.salary_advantage,
            years_to_break_even: metrics.years_to_break_even,
            lifetime_advantage: metrics.lifetime_advantage,
            category,
        }
    }

    pub fn break_even_years(&self) -> Option<f64> {
        self.years_to_break_even.years()
    }
}
