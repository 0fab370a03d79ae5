pub mod exploration;
pub mod insights_analyzer;

pub use exploration::ExplorationAnalyzer;
pub use insights_analyzer::InsightsAnalyzer;

use crate::error::Result;
use crate::models::{ChartData, Insights, RawSummary, SensorTable};

pub fn summarize(clean: &SensorTable) -> Result<Insights> {
    InsightsAnalyzer::new().summarize(clean)
}

pub fn chart_series(clean: &SensorTable) -> Result<ChartData> {
    InsightsAnalyzer::new().chart_series(clean)
}

pub fn raw_summary(raw: &SensorTable) -> RawSummary {
    ExplorationAnalyzer::new().summarize(raw)
}
