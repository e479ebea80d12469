//! ROI Calculator
//! Per-major return-on-investment arithmetic against a high-school baseline.

use serde::{Serialize, Serializer};

/// Assumed annual salary of a high-school graduate.
pub const HS_GRAD_SALARY: f64 = 40_000.0;
/// Years of a degree the tuition cost is charged for.
pub const DEGREE_YEARS: f64 = 4.0;
/// Career years paid at early-career pay.
pub const EARLY_CAREER_YEARS: f64 = 10.0;
/// Career years paid at mid-career pay.
pub const MID_CAREER_YEARS: f64 = 30.0;
/// Total modeled career length.
pub const CAREER_YEARS: f64 = EARLY_CAREER_YEARS + MID_CAREER_YEARS;
/// Value written for "never breaks even" in flat files and displays.
pub const BREAK_EVEN_SENTINEL: f64 = 999.0;

/// Years until the degree pays for itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BreakEven {
    /// Strictly positive, finite number of years.
    Years(f64),
    /// Early-career pay does not beat the high-school baseline.
    Never,
}

impl BreakEven {
    pub fn years(&self) -> Option<f64> {
        match self {
            BreakEven::Years(y) => Some(*y),
            BreakEven::Never => None,
        }
    }

    pub fn is_never(&self) -> bool {
        matches!(self, BreakEven::Never)
    }

    /// Flatten to the sentinel encoding used by the processed CSV.
    pub fn to_sentinel(&self) -> f64 {
        self.years().unwrap_or(BREAK_EVEN_SENTINEL)
    }

    /// Read back the sentinel encoding. Anything that is not a positive,
    /// finite duration below the sentinel is treated as never.
    pub fn from_sentinel(value: f64) -> BreakEven {
        if value.is_finite() && value > 0.0 && value < BREAK_EVEN_SENTINEL {
            BreakEven::Years(value)
        } else {
            BreakEven::Never
        }
    }
}

impl Serialize for BreakEven {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BreakEven::Years(y) => serializer.serialize_some(y),
            BreakEven::Never => serializer.serialize_none(),
        }
    }
}

/// Derived ROI fields for one major.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RoiMetrics {
    pub salary_advantage: f64,
    pub years_to_break_even: BreakEven,
    pub lifetime_advantage: f64,
}

/// Evaluates ROI for every major against one shared tuition cost.
#[derive(Debug, Clone, Copy)]
pub struct RoiCalculator {
    hs_grad_salary: f64,
    total_tuition_cost: f64,
}

impl RoiCalculator {
    pub fn new(total_tuition_cost: f64) -> Self {
        Self {
            hs_grad_salary: HS_GRAD_SALARY,
            total_tuition_cost,
        }
    }

    /// 4-year cost from one year's annual tuition.
    pub fn from_annual_tuition(annual_tuition: f64) -> Self {
        Self::new(annual_tuition * DEGREE_YEARS)
    }

    pub fn total_tuition_cost(&self) -> f64 {
        self.total_tuition_cost
    }

    pub fn evaluate(&self, early_career_pay: f64, mid_career_pay: f64) -> RoiMetrics {
        let salary_advantage = early_career_pay - self.hs_grad_salary;

        let years_to_break_even = if salary_advantage > 0.0 {
            BreakEven::Years(self.total_tuition_cost / salary_advantage)
        } else {
            BreakEven::Never
        };

        let lifetime_advantage = (early_career_pay * EARLY_CAREER_YEARS
            + mid_career_pay * MID_CAREER_YEARS)
            - self.hs_grad_salary * CAREER_YEARS
            - self.total_tuition_cost;

        RoiMetrics {
            salary_advantage,
            years_to_break_even,
            lifetime_advantage,
        }
    }
}
