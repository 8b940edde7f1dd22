pub mod error;
pub mod exceedance;
pub mod series;

pub use error::ClimatologyError;
pub use exceedance::exceedance_probability;
pub use series::{extract_daily_series, DailyReading, RawPointSeries, MISSING_SENTINEL};
