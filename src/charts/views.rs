//! Dashboard read views over the processed tables.
//!
//! The tables are loaded once and never mutated. Every view is a pure
//! function of them, so concurrent requests can share one instance.

use super::spec::{ChartId, ChartKind, ChartSeries, ChartSpec, Indicator};
use super::theme::{gradient, NEON_CYAN, NEON_MAGENTA};
use crate::data::{Category, DataLoader, DataProcessor, LoaderError, MajorRecord, TuitionSeries};
use crate::stats::StatsCalculator;
use serde::Serialize;
use tracing::info;

/// Records shown in the per-category top majors chart.
pub const TOP_MAJORS_LIMIT: usize = 15;
/// Records shown in the global fastest break-even chart.
pub const FASTEST_BREAK_EVEN_LIMIT: usize = 20;
/// Break-even years the indicator's delta is measured against.
pub const BREAK_EVEN_REFERENCE_YEARS: f64 = 5.0;
/// Category preselected in the dashboard.
pub const DEFAULT_CATEGORY: Category = Category::EngineeringTechnology;

/// Headline figures shown above the charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyStats {
    pub majors_analyzed: usize,
    pub avg_four_year_cost: Option<f64>,
    pub break_even_category: Category,
    pub avg_break_even: Option<f64>,
}

/// Category selector options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryOptions {
    pub categories: Vec<Category>,
    pub default: Category,
}

/// Both processed tables, immutable after load.
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    records: Vec<MajorRecord>,
    tuition: TuitionSeries,
}

impl DashboardData {
    pub fn new(records: Vec<MajorRecord>, tuition: TuitionSeries) -> Self {
        Self { records, tuition }
    }

    /// Load the processed salary and tuition files.
    pub fn load(loader: &DataLoader, salary_file: &str, tuition_file: &str) -> Result<Self, LoaderError> {
        let salary_df = loader.load_text_csv(salary_file)?;
        let records = DataProcessor::records_from_frame(&salary_df)?;

        let tuition_df = loader.load_text_csv(tuition_file)?;
        let tuition = TuitionSeries::from_frame(&tuition_df)?;

        info!(
            "Loaded {} majors and {} tuition years from {}",
            records.len(),
            tuition.len(),
            loader.data_dir().display()
        );
        Ok(Self { records, tuition })
    }

    pub fn records(&self) -> &[MajorRecord] {
        &self.records
    }

    pub fn tuition(&self) -> &TuitionSeries {
        &self.tuition
    }

    /// Build any chart by id. `category` is ignored by global charts.
    pub fn chart(&self, id: ChartId, category: &str) -> ChartSpec {
        match id {
            ChartId::TuitionTrend => self.tuition_trend(),
            ChartId::SalaryByCategory => self.salary_by_category(),
            ChartId::TopMajors => self.top_majors(category),
            ChartId::BreakEven => self.break_even(category),
            ChartId::FastestBreakEven => self.fastest_break_even(),
        }
    }

    /// Records of a category given by label. An unknown label selects nothing.
    fn select(&self, category: &str) -> Vec<&MajorRecord> {
        match Category::from_label(category) {
            Some(c) => StatsCalculator::in_category(&self.records, c),
            None => Vec::new(),
        }
    }

    pub fn tuition_trend(&self) -> ChartSpec {
        let points = self.tuition.points();
        let title = match self.tuition.year_range() {
            Some((first, last)) => format!("College Tuition Trends ({first}-{last})"),
            None => "College Tuition Trends".to_string(),
        };

        let mut series = ChartSeries::new(
            "Tuition",
            points.iter().map(|p| p.year_numeric.to_string()).collect(),
            points.iter().map(|p| p.tuition_cost).collect(),
            NEON_MAGENTA,
        );
        series.x = points.iter().map(|p| p.year_numeric as f64).collect();

        ChartSpec {
            id: ChartId::TuitionTrend,
            kind: ChartKind::Line,
            title,
            x_title: "Year".into(),
            y_title: "Annual Tuition (Constant Dollars)".into(),
            series: vec![series],
            indicator: None,
        }
    }

    pub fn salary_by_category(&self) -> ChartSpec {
        let mut averages: Vec<(Category, f64)> = StatsCalculator::compute_all_stats_parallel(&self.records)
            .into_iter()
            .filter_map(|s| s.mean_early_pay.map(|m| (s.category, m)))
            .collect();
        averages.sort_by(|a, b| a.1.total_cmp(&b.1));

        ChartSpec {
            id: ChartId::SalaryByCategory,
            kind: ChartKind::HorizontalBar,
            title: "Average Starting Salary by Major Category".into(),
            x_title: "Early Career Pay ($)".into(),
            y_title: String::new(),
            series: vec![ChartSeries::new(
                "Average early career pay",
                averages.iter().map(|(c, _)| c.label().to_string()).collect(),
                averages.iter().map(|(_, v)| *v).collect(),
                NEON_MAGENTA,
            )],
            indicator: None,
        }
    }

    pub fn top_majors(&self, category: &str) -> ChartSpec {
        let top = StatsCalculator::top_by_early_pay(self.select(category), TOP_MAJORS_LIMIT);
        let labels: Vec<String> = top.iter().map(|r| r.major.clone()).collect();

        ChartSpec {
            id: ChartId::TopMajors,
            kind: ChartKind::GroupedHorizontalBar,
            title: format!("Top {TOP_MAJORS_LIMIT} Majors in {category}"),
            x_title: "Salary ($)".into(),
            y_title: String::new(),
            series: vec![
                ChartSeries::new(
                    "Early Career",
                    labels.clone(),
                    top.iter().map(|r| r.early_career_pay).collect(),
                    NEON_MAGENTA,
                ),
                ChartSeries::new(
                    "Mid Career",
                    labels,
                    top.iter().map(|r| r.mid_career_pay).collect(),
                    NEON_CYAN,
                ),
            ],
            indicator: None,
        }
    }

    pub fn break_even(&self, category: &str) -> ChartSpec {
        let value = StatsCalculator::mean_break_even(self.select(category));

        ChartSpec {
            id: ChartId::BreakEven,
            kind: ChartKind::Indicator,
            title: "Avg Break-Even".into(),
            x_title: String::new(),
            y_title: String::new(),
            series: Vec::new(),
            indicator: Some(Indicator {
                value,
                has_data: value.is_some(),
                subtitle: "Years to recover costs".into(),
                suffix: " years".into(),
                reference: BREAK_EVEN_REFERENCE_YEARS,
                delta: value.map(|v| v - BREAK_EVEN_REFERENCE_YEARS),
            }),
        }
    }

    pub fn fastest_break_even(&self) -> ChartSpec {
        let fastest = StatsCalculator::fastest_break_even(&self.records, FASTEST_BREAK_EVEN_LIMIT);
        let years: Vec<f64> = fastest.iter().filter_map(|r| r.break_even_years()).collect();

        let (lo, hi) = years
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| (lo.min(*y), hi.max(*y)));
        let span = hi - lo;
        let colors = years
            .iter()
            .map(|y| gradient(if span > 0.0 { (y - lo) / span } else { 0.0 }))
            .collect();

        let series = ChartSeries {
            name: "Years to break even".into(),
            labels: fastest.iter().map(|r| r.major.clone()).collect(),
            text: years.iter().map(|y| format!("{y:.1} yrs")).collect(),
            values: years,
            x: Vec::new(),
            colors,
        };

        ChartSpec {
            id: ChartId::FastestBreakEven,
            kind: ChartKind::HorizontalBar,
            title: format!("{FASTEST_BREAK_EVEN_LIMIT} Fastest Break-Even Majors"),
            x_title: "Years to Break Even".into(),
            y_title: String::new(),
            series: vec![series],
            indicator: None,
        }
    }

    pub fn key_stats(&self) -> KeyStats {
        let costs: Vec<f64> = self
            .records
            .iter()
            .map(|r| r.total_tuition_cost)
            .filter(|c| c.is_finite())
            .collect();

        KeyStats {
            majors_analyzed: self.records.len(),
            avg_four_year_cost: StatsCalculator::mean(&costs),
            break_even_category: DEFAULT_CATEGORY,
            avg_break_even: StatsCalculator::mean_break_even(
                StatsCalculator::in_category(&self.records, DEFAULT_CATEGORY),
            ),
        }
    }

    pub fn categories(&self) -> CategoryOptions {
        CategoryOptions {
            categories: StatsCalculator::categories_present(&self.records),
            default: DEFAULT_CATEGORY,
        }
    }
}
