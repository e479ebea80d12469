//! Charts module - dashboard views and PNG rendering

mod renderer;
mod spec;
mod theme;
mod views;

pub use renderer::{ChartRenderer, RenderError};
pub use spec::{ChartId, ChartKind, ChartSeries, ChartSpec, Indicator};
pub use theme::{gradient, Rgb};
pub use views::{
    CategoryOptions, DashboardData, KeyStats, BREAK_EVEN_REFERENCE_YEARS, DEFAULT_CATEGORY,
    FASTEST_BREAK_EVEN_LIMIT, TOP_MAJORS_LIMIT,
};
