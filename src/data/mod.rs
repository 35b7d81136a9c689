//! Record model, filtering, aggregation and summary rollups.

pub mod aggregate;
pub mod balance;
pub mod filter;
pub mod record;
pub mod summary;

pub use aggregate::{
    DailyData, HourlyAverage, MonthlySummary, aggregate_by_day, aggregate_by_hour,
    aggregate_by_month,
};
pub use filter::{FilterOptions, filter};
pub use record::{SolarDataPoint, derive_metrics};
pub use summary::{DataSummary, summarize};
