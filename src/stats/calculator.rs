//! Statistics Calculator Module
//! Aggregates over cleaned major records: category means and rankings.

use crate::data::{Category, MajorRecord};
use rayon::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;

/// Aggregates for a single category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStats {
    pub category: Category,
    pub count: usize,
    pub mean_early_pay: Option<f64>,
    pub mean_mid_pay: Option<f64>,
    /// Mean over records that do break even. `None` when none do.
    pub mean_break_even: Option<f64>,
    pub break_even_count: usize,
}

/// Handles aggregate calculations over the major table.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Arithmetic mean, `None` for an empty input.
    pub fn mean(values: &[f64]) -> Option<f64> {
        let mean = values.mean();
        if mean.is_nan() {
            None
        } else {
            Some(mean)
        }
    }

    /// Records belonging to one category, in source order.
    pub fn in_category(records: &[MajorRecord], category: Category) -> Vec<&MajorRecord> {
        records.iter().filter(|r| r.category == category).collect()
    }

    /// Mean break-even years, skipping majors that never break even.
    pub fn mean_break_even<'a>(records: impl IntoIterator<Item = &'a MajorRecord>) -> Option<f64> {
        let years: Vec<f64> = records.into_iter().filter_map(|r| r.break_even_years()).collect();
        Self::mean(&years)
    }

    /// Compute statistics for one category.
    pub fn compute_category_stats(records: &[MajorRecord], category: Category) -> CategoryStats {
        let members = Self::in_category(records, category);

        let early: Vec<f64> = members.iter().map(|r| r.early_career_pay).collect();
        let mid: Vec<f64> = members.iter().map(|r| r.mid_career_pay).collect();
        let break_even: Vec<f64> = members.iter().filter_map(|r| r.break_even_years()).collect();

        CategoryStats {
            category,
            count: members.len(),
            mean_early_pay: Self::mean(&early),
            mean_mid_pay: Self::mean(&mid),
            mean_break_even: Self::mean(&break_even),
            break_even_count: break_even.len(),
        }
    }

    /// Compute statistics for every category present, in priority order.
    pub fn compute_all_stats_parallel(records: &[MajorRecord]) -> Vec<CategoryStats> {
        Category::ALL
            .par_iter()
            .map(|category| Self::compute_category_stats(records, *category))
            .filter(|stats| stats.count > 0)
            .collect()
    }

    /// Record count per category, largest first. Ties follow priority order.
    pub fn category_counts(records: &[MajorRecord]) -> Vec<(Category, usize)> {
        let mut counts: Vec<(Category, usize)> = Category::ALL
            .iter()
            .map(|c| (*c, records.iter().filter(|r| r.category == *c).count()))
            .filter(|(_, n)| *n > 0)
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    /// Distinct categories present, sorted by label.
    pub fn categories_present(records: &[MajorRecord]) -> Vec<Category> {
        let mut present: Vec<Category> = Category::ALL
            .into_iter()
            .filter(|c| records.iter().any(|r| r.category == *c))
            .collect();
        present.sort_by_key(|c| c.label());
        present
    }

    /// Highest and lowest early-career pay.
    pub fn early_pay_range(records: &[MajorRecord]) -> Option<(f64, f64)> {
        let min = records.iter().map(|r| r.early_career_pay).reduce(f64::min)?;
        let max = records.iter().map(|r| r.early_career_pay).reduce(f64::max)?;
        Some((min, max))
    }

    /// Top `k` records by early-career pay, highest first. Ties keep input order.
    pub fn top_by_early_pay<'a>(
        records: impl IntoIterator<Item = &'a MajorRecord>,
        k: usize,
    ) -> Vec<&'a MajorRecord> {
        let mut ranked: Vec<&MajorRecord> = records.into_iter().collect();
        ranked.sort_by(|a, b| b.early_career_pay.total_cmp(&a.early_career_pay));
        ranked.truncate(k);
        ranked
    }

    /// Top `k` records by break-even years, fastest first. Majors that never
    /// break even are excluded.
    pub fn fastest_break_even<'a>(
        records: impl IntoIterator<Item = &'a MajorRecord>,
        k: usize,
    ) -> Vec<&'a MajorRecord> {
        let mut ranked: Vec<(&MajorRecord, f64)> = records
            .into_iter()
            .filter_map(|r| r.break_even_years().map(|y| (r, y)))
            .collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        ranked.into_iter().take(k).map(|(r, _)| r).collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::data::RoiCalculator;

    pub(crate) fn record(major: &str, early: f64, mid: f64) -> MajorRecord {
        MajorRecord::derive(None, major, "Bachelors", early, mid, None, &RoiCalculator::new(104_160.0))
    }

    pub(crate) fn sample() -> Vec<MajorRecord> {
        vec![
            record("Software Engineering", 70_000.0, 120_000.0),
            record("Petroleum Engineering", 94_500.0, 175_500.0),
            record("Computer Science", 70_000.0, 130_000.0),
            record("Art History", 35_000.0, 60_000.0),
            record("Studio Art", 38_000.0, 55_000.0),
            record("Graphic Design", 42_000.0, 70_000.0),
            record("Finance", 55_000.0, 100_000.0),
            record("Criminal Justice", 41_000.0, 65_000.0),
        ]
    }

    #[test]
    fn mean_of_empty_is_missing() {
        assert_eq!(StatsCalculator::mean(&[]), None);
        assert_eq!(StatsCalculator::mean(&[2.0, 4.0]), Some(3.0));
    }

    #[test]
    fn category_stats_exclude_never_from_break_even_mean() {
        let records = sample();
        let arts = StatsCalculator::compute_category_stats(&records, Category::ArtsCommunications);
        assert_eq!(arts.count, 3);
        assert_eq!(arts.break_even_count, 1);
        let expected = 104_160.0 / 2_000.0;
        assert!((arts.mean_break_even.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn category_without_break_even_reports_missing() {
        let records = vec![record("Art History", 35_000.0, 60_000.0)];
        let stats = StatsCalculator::compute_category_stats(&records, Category::ArtsCommunications);
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean_break_even, None);
        assert_eq!(stats.mean_early_pay, Some(35_000.0));
    }

    #[test]
    fn parallel_stats_follow_priority_order() {
        let stats = StatsCalculator::compute_all_stats_parallel(&sample());
        let order: Vec<Category> = stats.iter().map(|s| s.category).collect();
        assert_eq!(
            order,
            vec![
                Category::EngineeringTechnology,
                Category::BusinessEconomics,
                Category::ArtsCommunications,
                Category::Other,
            ]
        );
    }

    #[test]
    fn top_by_early_pay_keeps_ties_in_order() {
        let records = sample();
        let top = StatsCalculator::top_by_early_pay(&records, 3);
        let names: Vec<&str> = top.iter().map(|r| r.major.as_str()).collect();
        assert_eq!(names, vec!["Petroleum Engineering", "Software Engineering", "Computer Science"]);
    }

    #[test]
    fn fastest_break_even_keeps_ties_in_order() {
        let records = sample();
        let fastest = StatsCalculator::fastest_break_even(&records, 3);
        let names: Vec<&str> = fastest.iter().map(|r| r.major.as_str()).collect();
        assert_eq!(names, vec!["Petroleum Engineering", "Software Engineering", "Computer Science"]);
    }

    #[test]
    fn fastest_break_even_skips_never() {
        let records = sample();
        let fastest = StatsCalculator::fastest_break_even(&records, 100);
        assert_eq!(fastest.len(), 6);
        assert_eq!(fastest[0].major, "Petroleum Engineering");
        assert!(fastest.iter().all(|r| !r.years_to_break_even.is_never()));
        let years: Vec<f64> = fastest.iter().filter_map(|r| r.break_even_years()).collect();
        assert!(years.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn categories_present_are_sorted_by_label() {
        let present = StatsCalculator::categories_present(&sample());
        let labels: Vec<&str> = present.iter().map(|c| c.label()).collect();
        assert_eq!(
            labels,
            vec!["Arts & Communications", "Business & Economics", "Engineering & Technology", "Other"]
        );
    }

    #[test]
    fn counts_are_largest_first() {
        let counts = StatsCalculator::category_counts(&sample());
        assert_eq!(counts[0], (Category::EngineeringTechnology, 3));
        assert_eq!(counts[1], (Category::ArtsCommunications, 3));
    }

    #[test]
    fn early_pay_range_spans_records() {
        assert_eq!(StatsCalculator::early_pay_range(&sample()), Some((35_000.0, 94_500.0)));
        assert_eq!(StatsCalculator::early_pay_range(&[]), None);
    }
}
