//! Preparation summary report, logged after the processed files are written.

use super::calculator::{CategoryStats, StatsCalculator};
use crate::data::{Category, MajorRecord, PreparedData};
use tracing::info;

const TOP_N: usize = 10;

/// One ranked line of the summary.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedMajor {
    pub major: String,
    pub early_career_pay: f64,
    pub mid_career_pay: f64,
    pub years_to_break_even: Option<f64>,
}

impl From<&MajorRecord> for RankedMajor {
    fn from(r: &MajorRecord) -> Self {
        Self {
            major: r.major.clone(),
            early_career_pay: r.early_career_pay,
            mid_career_pay: r.mid_career_pay,
            years_to_break_even: r.break_even_years(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SummaryReport {
    pub majors: usize,
    pub dropped_rows: usize,
    pub early_pay_range: Option<(f64, f64)>,
    pub tuition_years: Option<(i32, i32)>,
    pub first_year_tuition: Option<f64>,
    pub last_year_tuition: Option<f64>,
    pub cost_year: i32,
    pub annual_tuition: f64,
    pub total_tuition_cost: f64,
    pub category_counts: Vec<(Category, usize)>,
    pub highest_paying: Vec<RankedMajor>,
    pub fastest_break_even: Vec<RankedMajor>,
    pub category_stats: Vec<CategoryStats>,
}

impl SummaryReport {
    pub fn from_prepared(prepared: &PreparedData) -> Self {
        let records = &prepared.records;
        let tuition_years = prepared.tuition.year_range();
        let tuition_at = |year: i32| prepared.tuition.point_for_year(year).map(|p| p.tuition_cost);

        Self {
            majors: records.len(),
            dropped_rows: prepared.dropped_rows,
            early_pay_range: StatsCalculator::early_pay_range(records),
            tuition_years,
            first_year_tuition: tuition_years.and_then(|(first, _)| tuition_at(first)),
            last_year_tuition: tuition_years.and_then(|(_, last)| tuition_at(last)),
            cost_year: prepared.cost_year,
            annual_tuition: prepared.annual_tuition,
            total_tuition_cost: prepared.total_tuition_cost,
            category_counts: StatsCalculator::category_counts(records),
            highest_paying: StatsCalculator::top_by_early_pay(records, TOP_N)
                .into_iter()
                .map(RankedMajor::from)
                .collect(),
            fastest_break_even: StatsCalculator::fastest_break_even(records, TOP_N)
                .into_iter()
                .map(RankedMajor::from)
                .collect(),
            category_stats: StatsCalculator::compute_all_stats_parallel(records),
        }
    }

    /// Emit the report through `tracing`.
    pub fn log(&self) {
        info!(
            "Loaded {} majors ({} incomplete rows dropped)",
            self.majors, self.dropped_rows
        );
        if let Some((min, max)) = self.early_pay_range {
            info!("Salary range: {} - {}", dollars(min), dollars(max));
        }

        if let Some((first, last)) = self.tuition_years {
            info!("Tuition data from {} to {}", first, last);
            if let Some(cost) = self.first_year_tuition {
                info!("Tuition in {}: {}", first, dollars(cost));
            }
            if let Some(cost) = self.last_year_tuition {
                info!("Tuition in {}: {}", last, dollars(cost));
            }
        }
        info!(
            "Using average 4-year degree cost: {} (based on {} average annual tuition of {})",
            dollars(self.total_tuition_cost),
            self.cost_year,
            dollars(self.annual_tuition)
        );

        info!("Categorized into {} major categories:", self.category_counts.len());
        for (category, count) in &self.category_counts {
            info!("  {}: {} majors", category, count);
        }

        info!("Top {} highest paying majors:", self.highest_paying.len());
        for m in &self.highest_paying {
            info!(
                "  {:<45} early {:>10}  mid {:>10}",
                m.major,
                dollars(m.early_career_pay),
                dollars(m.mid_career_pay)
            );
        }

        info!("Best ROI majors (fastest break even):");
        for m in &self.fastest_break_even {
            info!(
                "  {:<45} early {:>10}  {:>5} yrs",
                m.major,
                dollars(m.early_career_pay),
                m.years_to_break_even.map(|y| format!("{y:.1}")).unwrap_or_else(|| "n/a".into())
            );
        }

        info!("Average stats by category:");
        for s in &self.category_stats {
            info!(
                "  {:<30} early {:>8}  mid {:>8}  break-even {}",
                s.category.label(),
                rounded(s.mean_early_pay),
                rounded(s.mean_mid_pay),
                rounded(s.mean_break_even)
            );
        }
    }
}

/// Whole-dollar amount with thousands separators, e.g. "$104,160".
pub fn dollars(amount: f64) -> String {
    let whole = amount.round().abs() as u64;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount.round() < 0.0 { "-" } else { "" };
    format!("{sign}${grouped}")
}

fn rounded(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.0}", v.round()))
        .unwrap_or_else(|| "n/a".to_string())
}
