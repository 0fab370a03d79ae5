pub mod analyzers;
pub mod cli;
pub mod config;
pub mod error;
pub mod generators;
pub mod models;
pub mod processors;
pub mod readers;
pub mod utils;
pub mod writers;

pub use analyzers::{chart_series, raw_summary, summarize};
pub use error::{ProcessingError, Result};
pub use generators::generate;
pub use models::{ChartData, Insights, RawSummary, SensorRecord, SensorTable};
pub use processors::{prepare, PreparedData};
pub use readers::load;
