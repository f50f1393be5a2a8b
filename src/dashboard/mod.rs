//! Dashboard module
//!
//! Summarizes one dataset's sales into KPI cards, charts, and ranked tables,
//! and projects the daily revenue series forward with a moving-average
//! forecast. The aggregation and forecast engines are pure functions;
//! everything else is presentation around them.

mod aggregation;
mod cards;
mod charts;
mod forecast;
mod handlers;
mod sale;
mod tables;

pub use aggregation::{
    DailyPoint, DashboardSummary, Kpis, LabelTotal, RangeFilter, UNSPECIFIED_LABEL, aggregate,
};
pub use forecast::{PointKind, PredictionPoint, forecast};
pub use handlers::{get_dashboard_content, get_dashboard_page};
pub use sale::Sale;

pub(crate) use forecast::FORECAST_HORIZON_DAYS;
pub(crate) use handlers::DashboardState;
pub(crate) use sale::{get_daily_revenue, get_sales_for_dataset};
