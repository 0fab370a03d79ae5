use crate::models::{ColumnData, ColumnProfile, NumericSummary, RawSummary, SensorTable};
use crate::processors::statistics;

/// Profiles a raw, uncleaned table for the exploration view
pub struct ExplorationAnalyzer;

impl ExplorationAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn summarize(&self, table: &SensorTable) -> RawSummary {
        let columns = table
            .columns()
            .iter()
            .map(|column| ColumnProfile {
                name: column.name.clone(),
                data_type: column.data.column_type().name().to_string(),
                missing: column.data.missing_count(),
                numeric_summary: numeric_summary(&column.data),
            })
            .collect();

        RawSummary {
            total_records: table.num_rows(),
            total_columns: table.num_columns(),
            columns,
            missing_count: table.missing_count(),
            duplicate_count: table.duplicate_count(),
        }
    }
}

impl Default for ExplorationAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

fn numeric_summary(data: &ColumnData) -> Option<NumericSummary> {
    let values = statistics::present(&data.as_f64()?);
    let sorted = statistics::sorted(&values);

    Some(NumericSummary {
        count: values.len(),
        mean: statistics::mean(&values),
        std: statistics::sample_std(&values),
        min: sorted.first().copied(),
        q25: statistics::quantile_sorted(&sorted, 0.25),
        median: statistics::quantile_sorted(&sorted, 0.5),
        q75: statistics::quantile_sorted(&sorted, 0.75),
        max: sorted.last().copied(),
    })
}
