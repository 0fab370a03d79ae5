pub mod insights;
pub mod record;
pub mod table;

pub use insights::{
    ChartData, ColumnProfile, DailyEnergy, HourlyEnergy, Insights, NumericSummary, RawSummary,
    TemperatureSeries,
};
pub use record::{ApplianceStatus, SensorRecord};
pub use table::{Column, ColumnData, ColumnType, SensorTable, Value};
