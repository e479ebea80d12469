//! Data module - CSV loading, cleaning and ROI derivation

mod category;
mod loader;
mod normalize;
mod processor;
mod record;
mod roi;
mod tuition;

pub use category::Category;
pub use loader::{DataLoader, LoaderError};
pub use normalize::{parse_decorated_number, parse_pay};
pub use processor::{CleanedSalaries, DataProcessor, PrepareError, PreparedData, WrittenFiles};
pub use record::MajorRecord;
pub use roi::{BreakEven, RoiCalculator, RoiMetrics, BREAK_EVEN_SENTINEL, HS_GRAD_SALARY};
pub use tuition::{filter_four_year_constant, parse_start_year, TuitionSeries, TuitionYearPoint};
