//! Data Processor Module
//! Cleans the raw survey tables, derives ROI fields and builds the
//! processed output frames.

use super::category::Category;
use super::loader::{require_columns, text_values, DataLoader, LoaderError};
use super::normalize::{parse_decorated_number, parse_optional, parse_pay};
use super::record::MajorRecord;
use super::roi::{BreakEven, RoiCalculator};
use super::tuition::{filter_four_year_constant, TuitionSeries, ALL_INSTITUTIONS, FOUR_YEAR_CONSTANT};
use polars::prelude::*;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

// Raw salary survey headers
pub const RAW_RANK: &str = "Rank";
pub const RAW_MAJOR: &str = "Major";
pub const RAW_DEGREE_TYPE: &str = "Degree Type";
pub const RAW_EARLY_PAY: &str = "Early Career Pay";
pub const RAW_MID_PAY: &str = "Mid-Career Pay";
pub const RAW_HIGH_MEANING: &str = "% High Meaning";

// Processed salary columns, in output order
pub const COL_RANK: &str = "rank";
pub const COL_MAJOR: &str = "major";
pub const COL_DEGREE_TYPE: &str = "degree_type";
pub const COL_EARLY_PAY: &str = "early_career_pay";
pub const COL_MID_PAY: &str = "mid_career_pay";
pub const COL_HIGH_MEANING: &str = "high_meaning_pct";
pub const COL_TOTAL_COST: &str = "total_tuition_cost";
pub const COL_SALARY_ADVANTAGE: &str = "salary_advantage";
pub const COL_BREAK_EVEN: &str = "years_to_break_even";
pub const COL_LIFETIME_ADVANTAGE: &str = "lifetime_advantage";
pub const COL_CATEGORY: &str = "category";

#[derive(Error, Debug)]
pub enum PrepareError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("No '{tuition_type}' / '{institution_type}' rows found in tuition data")]
    MissingTuitionSeries {
        tuition_type: &'static str,
        institution_type: &'static str,
    },
    #[error("Tuition cost for {year} is not a positive amount: {cost}")]
    InvalidTuitionCost { year: i32, cost: f64 },
    #[error("{unusable} of {total} tuition series rows have an unreadable year or cost")]
    UnusableTuitionRows { unusable: usize, total: usize },
}

/// Result of cleaning the salary table.
#[derive(Debug, Clone)]
pub struct CleanedSalaries {
    pub records: Vec<MajorRecord>,
    pub raw_rows: usize,
    pub dropped_rows: usize,
}

/// Everything a preparation run derives, before anything is written.
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub records: Vec<MajorRecord>,
    pub tuition: TuitionSeries,
    pub cost_year: i32,
    pub annual_tuition: f64,
    pub total_tuition_cost: f64,
    pub raw_rows: usize,
    pub dropped_rows: usize,
}

/// Paths written by a preparation run.
#[derive(Debug, Clone)]
pub struct WrittenFiles {
    pub salary_path: PathBuf,
    pub tuition_path: PathBuf,
}

/// Handles data cleaning and transformation operations.
pub struct DataProcessor;

impl DataProcessor {
    /// Filter the raw tuition table and derive the shared 4-year cost.
    ///
    /// A missing series, an unreadable series row or a non-positive latest
    /// cost is an error: every ROI figure depends on this one constant.
    pub fn tuition_baseline(raw_tuition: &DataFrame) -> Result<(TuitionSeries, i32, RoiCalculator), PrepareError> {
        let filtered = filter_four_year_constant(raw_tuition)?;
        let series = TuitionSeries::from_frame(&filtered)?;

        // A skipped row could be the latest year; never fall back to an older one.
        if series.len() < filtered.height() {
            return Err(PrepareError::UnusableTuitionRows {
                unusable: filtered.height() - series.len(),
                total: filtered.height(),
            });
        }

        let (year, total_cost) = series
            .four_year_cost()
            .ok_or(PrepareError::MissingTuitionSeries {
                tuition_type: FOUR_YEAR_CONSTANT,
                institution_type: ALL_INSTITUTIONS,
            })?;

        if !total_cost.is_finite() || total_cost <= 0.0 {
            return Err(PrepareError::InvalidTuitionCost {
                year,
                cost: total_cost,
            });
        }

        Ok((series, year, RoiCalculator::new(total_cost)))
    }

    /// Clean the raw salary survey and derive a record per surviving row.
    ///
    /// Rows without a major name or without both pay figures are dropped.
    pub fn clean_salaries(
        raw_salaries: &DataFrame,
        calculator: &RoiCalculator,
    ) -> Result<CleanedSalaries, LoaderError> {
        require_columns(
            raw_salaries,
            "salaries",
            &[RAW_RANK, RAW_MAJOR, RAW_DEGREE_TYPE, RAW_EARLY_PAY, RAW_MID_PAY, RAW_HIGH_MEANING],
        )?;

        let ranks = text_values(raw_salaries, RAW_RANK)?;
        let majors = text_values(raw_salaries, RAW_MAJOR)?;
        let degree_types = text_values(raw_salaries, RAW_DEGREE_TYPE)?;
        let early_pay = text_values(raw_salaries, RAW_EARLY_PAY)?;
        let mid_pay = text_values(raw_salaries, RAW_MID_PAY)?;
        let high_meaning = text_values(raw_salaries, RAW_HIGH_MEANING)?;

        let raw_rows = raw_salaries.height();
        let mut records = Vec::with_capacity(raw_rows);

        for i in 0..raw_rows {
            let (Some(major), Some(early), Some(mid)) = (
                majors[i].map(str::trim).filter(|m| !m.is_empty()),
                early_pay[i].and_then(parse_pay),
                mid_pay[i].and_then(parse_pay),
            ) else {
                debug!("Dropping salary row {} ({:?})", i, majors[i]);
                continue;
            };

            records.push(MajorRecord::derive(
                ranks[i].and_then(parse_rank),
                major,
                degree_types[i].unwrap_or_default().trim(),
                early,
                mid,
                parse_optional(high_meaning[i]),
                calculator,
            ));
        }

        let dropped_rows = raw_rows - records.len();
        Ok(CleanedSalaries {
            records,
            raw_rows,
            dropped_rows,
        })
    }

    /// Run the full transform on two raw text frames.
    pub fn prepare(raw_salaries: &DataFrame, raw_tuition: &DataFrame) -> Result<PreparedData, PrepareError> {
        let (tuition, cost_year, calculator) = Self::tuition_baseline(raw_tuition)?;
        let cleaned = Self::clean_salaries(raw_salaries, &calculator)?;

        let annual_tuition = tuition
            .point_for_year(cost_year)
            .map(|p| p.tuition_cost)
            .unwrap_or_default();

        Ok(PreparedData {
            records: cleaned.records,
            tuition,
            cost_year,
            annual_tuition,
            total_tuition_cost: calculator.total_tuition_cost(),
            raw_rows: cleaned.raw_rows,
            dropped_rows: cleaned.dropped_rows,
        })
    }

    /// Load both raw files, prepare, and write both processed files.
    ///
    /// Both output frames are built before either file is touched, and both
    /// files are replaced together, so a failing run leaves previous outputs
    /// as they were.
    pub fn run(
        loader: &DataLoader,
        salary_file: &str,
        tuition_file: &str,
        processed_salary_file: &str,
        processed_tuition_file: &str,
    ) -> Result<(PreparedData, WrittenFiles), PrepareError> {
        info!("Loading salary data by major from {}", loader.path(salary_file).display());
        let raw_salaries = loader.load_text_csv(salary_file)?;

        info!("Loading historical tuition data from {}", loader.path(tuition_file).display());
        let raw_tuition = loader.load_text_csv(tuition_file)?;

        let prepared = Self::prepare(&raw_salaries, &raw_tuition)?;

        let mut salary_df = Self::records_to_frame(&prepared.records)?;
        let mut tuition_df = prepared.tuition.to_frame()?;

        loader.write_csvs(vec![
            (&mut salary_df, processed_salary_file),
            (&mut tuition_df, processed_tuition_file),
        ])?;

        Ok((
            prepared,
            WrittenFiles {
                salary_path: loader.path(processed_salary_file),
                tuition_path: loader.path(processed_tuition_file),
            },
        ))
    }

    /// Flat frame for `processed_salary_data.csv`. Never-breaks-even is
    /// written as the 999 sentinel.
    pub fn records_to_frame(records: &[MajorRecord]) -> PolarsResult<DataFrame> {
        let ranks: Vec<Option<i64>> = records.iter().map(|r| r.rank).collect();
        let majors: Vec<&str> = records.iter().map(|r| r.major.as_str()).collect();
        let degree_types: Vec<&str> = records.iter().map(|r| r.degree_type.as_str()).collect();
        let early: Vec<f64> = records.iter().map(|r| r.early_career_pay).collect();
        let mid: Vec<f64> = records.iter().map(|r| r.mid_career_pay).collect();
        let meaning: Vec<Option<f64>> = records.iter().map(|r| r.high_meaning_pct).collect();
        let total_cost: Vec<f64> = records.iter().map(|r| r.total_tuition_cost).collect();
        let advantage: Vec<f64> = records.iter().map(|r| r.salary_advantage).collect();
        let break_even: Vec<f64> = records.iter().map(|r| r.years_to_break_even.to_sentinel()).collect();
        let lifetime: Vec<f64> = records.iter().map(|r| r.lifetime_advantage).collect();
        let categories: Vec<&str> = records.iter().map(|r| r.category.label()).collect();

        DataFrame::new(vec![
            Column::new(COL_RANK.into(), ranks),
            Column::new(COL_MAJOR.into(), majors),
            Column::new(COL_DEGREE_TYPE.into(), degree_types),
            Column::new(COL_EARLY_PAY.into(), early),
            Column::new(COL_MID_PAY.into(), mid),
            Column::new(COL_HIGH_MEANING.into(), meaning),
            Column::new(COL_TOTAL_COST.into(), total_cost),
            Column::new(COL_SALARY_ADVANTAGE.into(), advantage),
            Column::new(COL_BREAK_EVEN.into(), break_even),
            Column::new(COL_LIFETIME_ADVANTAGE.into(), lifetime),
            Column::new(COL_CATEGORY.into(), categories),
        ])
    }

    /// Read records back from a processed salary text frame.
    ///
    /// Derived fields are taken as written. An unrecognised category label is
    /// re-derived from the major name. Rows lacking a pay figure are skipped.
    pub fn records_from_frame(df: &DataFrame) -> Result<Vec<MajorRecord>, LoaderError> {
        require_columns(
            df,
            "processed salaries",
            &[
                COL_RANK,
                COL_MAJOR,
                COL_DEGREE_TYPE,
                COL_EARLY_PAY,
                COL_MID_PAY,
                COL_HIGH_MEANING,
                COL_TOTAL_COST,
                COL_SALARY_ADVANTAGE,
                COL_BREAK_EVEN,
                COL_LIFETIME_ADVANTAGE,
                COL_CATEGORY,
            ],
        )?;

        let ranks = text_values(df, COL_RANK)?;
        let majors = text_values(df, COL_MAJOR)?;
        let degree_types = text_values(df, COL_DEGREE_TYPE)?;
        let early = text_values(df, COL_EARLY_PAY)?;
        let mid = text_values(df, COL_MID_PAY)?;
        let meaning = text_values(df, COL_HIGH_MEANING)?;
        let total_cost = text_values(df, COL_TOTAL_COST)?;
        let advantage = text_values(df, COL_SALARY_ADVANTAGE)?;
        let break_even = text_values(df, COL_BREAK_EVEN)?;
        let lifetime = text_values(df, COL_LIFETIME_ADVANTAGE)?;
        let categories = text_values(df, COL_CATEGORY)?;

        let mut records = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let (Some(major), Some(early_pay), Some(mid_pay)) = (
                majors[i],
                early[i].and_then(parse_pay),
                mid[i].and_then(parse_pay),
            ) else {
                continue;
            };

            let category = categories[i]
                .and_then(Category::from_label)
                .unwrap_or_else(|| Category::classify(major));
            let years_to_break_even = break_even[i]
                .and_then(parse_decorated_number)
                .map(BreakEven::from_sentinel)
                .unwrap_or(BreakEven::Never);

            records.push(MajorRecord {
                rank: ranks[i].and_then(parse_rank),
                major: major.to_string(),
                degree_type: degree_types[i].unwrap_or_default().to_string(),
                early_career_pay: early_pay,
                mid_career_pay: mid_pay,
                high_meaning_pct: parse_optional(meaning[i]),
                total_tuition_cost: parse_optional(total_cost[i]).unwrap_or(f64::NAN),
                salary_advantage: parse_optional(advantage[i]).unwrap_or(f64::NAN),
                years_to_break_even,
                lifetime_advantage: parse_optional(lifetime[i]).unwrap_or(f64::NAN),
                category,
            });
        }

        Ok(records)
    }
}

/// Survey rank, tolerating a float rendering such as "12.0".
fn parse_rank(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<i64>()
        .ok()
        .or_else(|| parse_decorated_number(raw).filter(|v| v.fract() == 0.0).map(|v| v as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::roi::BREAK_EVEN_SENTINEL;

    fn raw_salaries() -> DataFrame {
        DataFrame::new(vec![
            Column::new(RAW_RANK.into(), vec![Some("1"), Some("2"), Some("3"), Some("4"), Some("5")]),
            Column::new(
                RAW_MAJOR.into(),
                vec![
                    Some("Software Engineering"),
                    Some("Art History"),
                    Some("Underwater Basket Weaving"),
                    None,
                    Some("Nursing"),
                ],
            ),
            Column::new(
                RAW_DEGREE_TYPE.into(),
                vec![Some("Bachelors"), Some("Bachelors"), Some("Bachelors"), Some("Bachelors"), None],
            ),
            Column::new(
                RAW_EARLY_PAY.into(),
                vec![Some("$70,000"), Some("$35,000"), Some("-"), Some("$50,000"), Some("$0")],
            ),
            Column::new(
                RAW_MID_PAY.into(),
                vec![Some("$120,000"), Some("$60,000"), Some("$45,000"), Some("$80,000"), Some("$80,000")],
            ),
            Column::new(
                RAW_HIGH_MEANING.into(),
                vec![Some("55%"), Some("-"), Some("10%"), Some("40%"), Some("80%")],
            ),
        ])
        .unwrap()
    }

    fn raw_tuition(costs: &[&str]) -> DataFrame {
        let n = costs.len();
        let years: Vec<String> = (0..n).map(|i| format!("{}-{:02}", 2014 + i, (15 + i) % 100)).collect();
        DataFrame::new(vec![
            Column::new("type".into(), vec![ALL_INSTITUTIONS; n]),
            Column::new("year".into(), years),
            Column::new("tuition_type".into(), vec![FOUR_YEAR_CONSTANT; n]),
            Column::new("tuition_cost".into(), costs.to_vec()),
        ])
        .unwrap()
    }

    #[test]
    fn prepares_records_and_drops_incomplete_rows() {
        let prepared = DataProcessor::prepare(&raw_salaries(), &raw_tuition(&["25000", "26040"])).unwrap();

        assert_eq!(prepared.cost_year, 2015);
        assert_eq!(prepared.annual_tuition, 26_040.0);
        assert_eq!(prepared.total_tuition_cost, 104_160.0);
        assert_eq!(prepared.raw_rows, 5);
        assert_eq!(prepared.dropped_rows, 2);

        let majors: Vec<&str> = prepared.records.iter().map(|r| r.major.as_str()).collect();
        assert_eq!(majors, vec!["Software Engineering", "Art History", "Nursing"]);

        let swe = &prepared.records[0];
        assert_eq!(swe.category, Category::EngineeringTechnology);
        assert_eq!(swe.salary_advantage, 30_000.0);
        assert!((swe.break_even_years().unwrap() - 3.472).abs() < 1e-9);
        assert_eq!(swe.high_meaning_pct, Some(55.0));
        assert_eq!(swe.rank, Some(1));

        let art = &prepared.records[1];
        assert_eq!(art.category, Category::ArtsCommunications);
        assert_eq!(art.salary_advantage, -5_000.0);
        assert_eq!(art.years_to_break_even, BreakEven::Never);
        assert_eq!(art.high_meaning_pct, None);
    }

    #[test]
    fn zero_pay_is_kept() {
        let prepared = DataProcessor::prepare(&raw_salaries(), &raw_tuition(&["26040"])).unwrap();
        let nursing = prepared.records.iter().find(|r| r.major == "Nursing").unwrap();
        assert_eq!(nursing.early_career_pay, 0.0);
        assert!(nursing.years_to_break_even.is_never());
        assert_eq!(nursing.degree_type, "");
    }

    #[test]
    fn cleaned_records_satisfy_invariants() {
        let prepared = DataProcessor::prepare(&raw_salaries(), &raw_tuition(&["26040"])).unwrap();
        for r in &prepared.records {
            assert!(r.early_career_pay >= 0.0 && r.mid_career_pay >= 0.0);
            match r.years_to_break_even {
                BreakEven::Years(y) => assert!(y.is_finite() && y > 0.0),
                BreakEven::Never => assert_eq!(r.years_to_break_even.to_sentinel(), BREAK_EVEN_SENTINEL),
            }
            assert!(Category::ALL.contains(&r.category));
            assert_eq!(r.total_tuition_cost, prepared.total_tuition_cost);
        }
    }

    #[test]
    fn missing_tuition_series_is_fatal() {
        let tuition = DataFrame::new(vec![
            Column::new("type".into(), vec![ALL_INSTITUTIONS]),
            Column::new("year".into(), vec!["2016-17"]),
            Column::new("tuition_type".into(), vec!["2 Year Current"]),
            Column::new("tuition_cost".into(), vec!["3500"]),
        ])
        .unwrap();
        let err = DataProcessor::prepare(&raw_salaries(), &tuition).unwrap_err();
        assert!(matches!(err, PrepareError::MissingTuitionSeries { .. }));
    }

    #[test]
    fn non_positive_tuition_cost_is_fatal() {
        let err = DataProcessor::prepare(&raw_salaries(), &raw_tuition(&["26040", "0"])).unwrap_err();
        assert!(matches!(err, PrepareError::InvalidTuitionCost { year: 2015, .. }));
    }

    #[test]
    fn unreadable_latest_tuition_cost_is_fatal() {
        let err = DataProcessor::prepare(&raw_salaries(), &raw_tuition(&["10000", "-"])).unwrap_err();
        assert!(matches!(err, PrepareError::UnusableTuitionRows { unusable: 1, total: 2 }));
    }

    #[test]
    fn unreadable_tuition_year_is_fatal() {
        let tuition = DataFrame::new(vec![
            Column::new("type".into(), vec![ALL_INSTITUTIONS; 2]),
            Column::new("year".into(), vec!["2014-15", "n/a"]),
            Column::new("tuition_type".into(), vec![FOUR_YEAR_CONSTANT; 2]),
            Column::new("tuition_cost".into(), vec!["25000", "26040"]),
        ])
        .unwrap();
        let err = DataProcessor::prepare(&raw_salaries(), &tuition).unwrap_err();
        assert!(matches!(err, PrepareError::UnusableTuitionRows { .. }));
    }

    #[test]
    fn missing_salary_column_is_fatal() {
        let salaries = raw_salaries().drop(RAW_MID_PAY).unwrap();
        let err = DataProcessor::prepare(&salaries, &raw_tuition(&["26040"])).unwrap_err();
        assert!(matches!(
            err,
            PrepareError::Loader(LoaderError::MissingColumn { .. })
        ));
    }

    #[test]
    fn output_frame_has_processed_columns() {
        let prepared = DataProcessor::prepare(&raw_salaries(), &raw_tuition(&["26040"])).unwrap();
        let df = DataProcessor::records_to_frame(&prepared.records).unwrap();
        let names: Vec<String> = df.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "rank",
                "major",
                "degree_type",
                "early_career_pay",
                "mid_career_pay",
                "high_meaning_pct",
                "total_tuition_cost",
                "salary_advantage",
                "years_to_break_even",
                "lifetime_advantage",
                "category",
            ]
        );

        let break_even: Vec<Option<f64>> = df.column(COL_BREAK_EVEN).unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(break_even[1], Some(999.0));
    }

    #[test]
    fn parses_rank_variants() {
        assert_eq!(parse_rank("12"), Some(12));
        assert_eq!(parse_rank("12.0"), Some(12));
        assert_eq!(parse_rank("12.5"), None);
        assert_eq!(parse_rank("-"), None);
    }
}
