//! Chart descriptions handed to the dashboard: series data plus display
//! metadata, independent of how they are drawn.

use super::theme::Rgb;
use serde::Serialize;

/// The dashboard's chart endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartId {
    TuitionTrend,
    SalaryByCategory,
    TopMajors,
    BreakEven,
    FastestBreakEven,
}

impl ChartId {
    pub const ALL: [ChartId; 5] = [
        ChartId::TuitionTrend,
        ChartId::SalaryByCategory,
        ChartId::TopMajors,
        ChartId::BreakEven,
        ChartId::FastestBreakEven,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            ChartId::TuitionTrend => "tuition-trend",
            ChartId::SalaryByCategory => "salary-by-category",
            ChartId::TopMajors => "top-majors",
            ChartId::BreakEven => "break-even",
            ChartId::FastestBreakEven => "fastest-break-even",
        }
    }

    pub fn from_slug(slug: &str) -> Option<ChartId> {
        Self::ALL.into_iter().find(|id| id.slug() == slug)
    }

    /// Whether the chart is recomputed per selected category.
    pub fn takes_category(&self) -> bool {
        matches!(self, ChartId::TopMajors | ChartId::BreakEven)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    HorizontalBar,
    GroupedHorizontalBar,
    Indicator,
}

/// One data series. `labels[i]` names `values[i]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    /// Numeric x positions, for line charts.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub x: Vec<f64>,
    /// Per-point annotation shown next to each bar.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<String>,
    /// One color for the whole series, or one per point.
    pub colors: Vec<Rgb>,
}

impl ChartSeries {
    pub fn new(name: impl Into<String>, labels: Vec<String>, values: Vec<f64>, color: Rgb) -> Self {
        Self {
            name: name.into(),
            labels,
            values,
            x: Vec::new(),
            text: Vec::new(),
            colors: vec![color],
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Color of point `i`.
    pub fn color_at(&self, i: usize) -> Option<Rgb> {
        match self.colors.len() {
            0 => None,
            1 => self.colors.first().copied(),
            _ => self.colors.get(i).copied(),
        }
    }
}

/// Single-number display. `value` is `None` when there is nothing to
/// average, which the page shows as "no data" rather than zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Indicator {
    pub value: Option<f64>,
    pub has_data: bool,
    pub subtitle: String,
    pub suffix: String,
    pub reference: f64,
    pub delta: Option<f64>,
}

/// A fully described chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub id: ChartId,
    pub kind: ChartKind,
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub series: Vec<ChartSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicator: Option<Indicator>,
}

impl ChartSpec {
    /// Number of points across all series.
    pub fn point_count(&self) -> usize {
        self.series.iter().map(ChartSeries::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.point_count() == 0 && self.indicator.as_ref().map_or(true, |i| !i.has_data)
    }
}
