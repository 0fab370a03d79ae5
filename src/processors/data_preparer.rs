use chrono::{Datelike, NaiveDateTime, Timelike};
use tracing::debug;

use crate::error::{ProcessingError, Result};
use crate::models::{ColumnData, SensorTable};
use crate::processors::statistics;
use crate::utils::constants::{
    COL_DAY_NAME, COL_DAY_OF_WEEK, COL_ENERGY_USAGE, COL_HOUR, COL_IS_PEAK_HOUR, COL_TIMESTAMP,
    DAY_NAMES, DERIVED_COLUMNS, PEAK_USAGE_QUANTILE,
};
use crate::utils::timestamps::parse_timestamp;

/// Output of one preparation run
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedData {
    pub table: SensorTable,
    pub duplicates_removed: usize,
    pub missing_values_filled: usize,
    /// Energy level above which a row counts as peak usage
    pub peak_threshold: Option<f64>,
}

pub struct DataPreparer;

impl DataPreparer {
    pub fn new() -> Self {
        Self
    }

    /// Clean and enrich a raw table.
    ///
    /// Works on a copy: imputes numeric gaps with column medians, drops fully
    /// identical rows, then derives `hour`, `day_of_week`, `day_name` and
    /// `is_peak_hour` from the timestamp. Without a `timestamp` column the
    /// feature step is skipped.
    pub fn prepare(&self, raw: &SensorTable) -> Result<PreparedData> {
        let mut imputed = raw.clone();
        let missing_values_filled = self.impute_missing(&mut imputed);

        let initial_count = imputed.num_rows();
        let mut table = self.remove_duplicates(&imputed);
        let duplicates_removed = initial_count - table.num_rows();

        let peak_threshold = if table.has_column(COL_TIMESTAMP) {
            self.ensure_timestamps(&mut table)?;
            self.derive_time_features(&mut table)?;
            self.flag_peak_usage(&mut table)?
        } else {
            debug!("No timestamp column, skipping feature derivation");
            None
        };

        debug!(
            rows = table.num_rows(),
            duplicates_removed,
            missing_values_filled,
            peak_threshold,
            "Prepared sensor table"
        );

        Ok(PreparedData {
            table,
            duplicates_removed,
            missing_values_filled,
            peak_threshold,
        })
    }

    /// Fill each numeric column's gaps with its median, one column at a time.
    /// Derived time features are left as they are. Returns the number of cells filled.
    fn impute_missing(&self, table: &mut SensorTable) -> usize {
        let names: Vec<String> = table
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut filled = 0;
        for name in names {
            if DERIVED_COLUMNS.contains(&name.as_str()) {
                continue;
            }
            let Some(data) = table.column_mut(&name) else {
                continue;
            };
            if !data.column_type().is_numeric() || data.missing_count() == 0 {
                continue;
            }

            let Some(values) = data.as_f64() else {
                continue;
            };
            let Some(median) = statistics::median(&statistics::present(&values)) else {
                debug!(column = %name, "Column has no values to impute from");
                continue;
            };

            let missing = data.missing_count();
            // Integer columns with gaps become float columns, as the median may be fractional
            *data = ColumnData::Float(values.into_iter().map(|v| Some(v.unwrap_or(median))).collect());
            filled += missing;

            debug!(column = %name, median, missing, "Imputed missing values");
        }

        filled
    }

    /// Keep the first occurrence of every distinct row
    fn remove_duplicates(&self, table: &SensorTable) -> SensorTable {
        let keep: Vec<usize> = table
            .duplicated_mask()
            .into_iter()
            .enumerate()
            .filter_map(|(i, duplicated)| (!duplicated).then_some(i))
            .collect();

        if keep.len() == table.num_rows() {
            table.clone()
        } else {
            table.take_rows(&keep)
        }
    }

    /// Convert a textual timestamp column to temporal values; no-op if already parsed
    fn ensure_timestamps(&self, table: &mut SensorTable) -> Result<()> {
        let parsed = match table.require(COL_TIMESTAMP)? {
            ColumnData::Timestamp(_) => return Ok(()),
            ColumnData::Text(values) => values
                .iter()
                .map(|v| v.as_deref().map(parse_timestamp).transpose())
                .collect::<Result<Vec<_>>>()?,
            other => {
                return Err(ProcessingError::TypeMismatch {
                    column: COL_TIMESTAMP.to_string(),
                    expected: "datetime",
                    found: other.column_type().name(),
                })
            }
        };

        table.set_column(COL_TIMESTAMP, ColumnData::Timestamp(parsed))
    }

    fn derive_time_features(&self, table: &mut SensorTable) -> Result<()> {
        let timestamps: Vec<Option<NaiveDateTime>> = match table.require(COL_TIMESTAMP)? {
            ColumnData::Timestamp(values) => values.clone(),
            other => {
                return Err(ProcessingError::TypeMismatch {
                    column: COL_TIMESTAMP.to_string(),
                    expected: "datetime",
                    found: other.column_type().name(),
                })
            }
        };

        let hours = timestamps
            .iter()
            .map(|t| t.map(|t| i64::from(t.hour())))
            .collect();
        let weekdays: Vec<Option<usize>> = timestamps
            .iter()
            .map(|t| t.map(|t| t.weekday().num_days_from_monday() as usize))
            .collect();
        let day_of_week = weekdays.iter().map(|d| d.map(|d| d as i64)).collect();
        let day_names = weekdays
            .iter()
            .map(|d| d.map(|d| DAY_NAMES[d].to_string()))
            .collect();

        table.set_column(COL_HOUR, ColumnData::Int(hours))?;
        table.set_column(COL_DAY_OF_WEEK, ColumnData::Int(day_of_week))?;
        table.set_column(COL_DAY_NAME, ColumnData::Text(day_names))?;

        Ok(())
    }

    /// Mark rows whose energy usage exceeds the configured quantile of the column
    fn flag_peak_usage(&self, table: &mut SensorTable) -> Result<Option<f64>> {
        if !table.has_column(COL_ENERGY_USAGE) {
            return Ok(None);
        }

        let energy = table.numeric(COL_ENERGY_USAGE)?;
        let threshold = statistics::quantile(&statistics::present(&energy), PEAK_USAGE_QUANTILE);

        let flags = energy
            .iter()
            .map(|value| match (value, threshold) {
                (Some(value), Some(threshold)) => Some(*value > threshold),
                _ => Some(false),
            })
            .collect();

        table.set_column(COL_IS_PEAK_HOUR, ColumnData::Bool(flags))?;

        Ok(threshold)
    }
}

impl Default for DataPreparer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApplianceStatus, Column, SensorRecord, Value};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn ts(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn record(hour: u32, energy: f64) -> SensorRecord {
        SensorRecord::new(ts(1, hour), 20.0, 60.0, energy, false, ApplianceStatus::Off)
    }

    #[test]
    fn test_does_not_mutate_raw() {
        let mut records = vec![record(0, 1.0), record(1, 2.0), record(0, 1.0)];
        records[1].temperature = None;
        let raw = SensorTable::from_records(&records);
        let snapshot = raw.clone();

        let prepared = DataPreparer::new().prepare(&raw).unwrap();

        assert_eq!(raw, snapshot);
        assert_eq!(prepared.duplicates_removed, 1);
        assert_eq!(prepared.missing_values_filled, 1);
        assert_eq!(prepared.table.num_rows(), 2);
    }

    #[test]
    fn test_imputes_with_column_median() {
        let mut records: Vec<SensorRecord> = (0..4).map(|h| record(h, h as f64 + 1.0)).collect();
        records[0].humidity = Some(40.0);
        records[1].humidity = Some(50.0);
        records[2].humidity = Some(70.0);
        records[3].humidity = None;

        let prepared = DataPreparer::new()
            .prepare(&SensorTable::from_records(&records))
            .unwrap();

        let humidity = prepared.table.numeric("humidity").unwrap();
        assert_eq!(humidity[3], Some(50.0));
        assert_eq!(prepared.table.column("humidity").unwrap().missing_count(), 0);
    }

    #[test]
    fn test_integer_column_with_gaps_becomes_float() {
        let table = SensorTable::from_columns(vec![Column::new(
            "motion_detected",
            ColumnData::Int(vec![Some(0), Some(1), None]),
        )])
        .unwrap();

        let prepared = DataPreparer::new().prepare(&table).unwrap();
        assert_eq!(
            prepared.table.column("motion_detected").unwrap(),
            &ColumnData::Float(vec![Some(0.0), Some(1.0), Some(0.5)])
        );
    }

    #[test]
    fn test_all_missing_column_is_left_alone() {
        let table = SensorTable::from_columns(vec![Column::new(
            "energy_usage",
            ColumnData::Float(vec![None, None]),
        )])
        .unwrap();

        let prepared = DataPreparer::new().prepare(&table).unwrap();
        assert_eq!(prepared.missing_values_filled, 0);
        assert_eq!(prepared.table.column("energy_usage").unwrap().missing_count(), 1);
    }

    #[test]
    fn test_peak_threshold_fixture() {
        let records: Vec<SensorRecord> = (0..8).map(|h| record(h, h as f64 + 1.0)).collect();
        let prepared = DataPreparer::new()
            .prepare(&SensorTable::from_records(&records))
            .unwrap();

        assert_eq!(prepared.peak_threshold, Some(6.25));
        let flags = match prepared.table.column("is_peak_hour").unwrap() {
            ColumnData::Bool(flags) => flags.clone(),
            other => panic!("unexpected column {:?}", other),
        };
        assert_eq!(flags.iter().filter(|f| **f == Some(true)).count(), 2);
        assert_eq!(flags[6], Some(true));
        assert_eq!(flags[7], Some(true));
        assert_eq!(flags[5], Some(false));
    }

    #[test]
    fn test_derives_time_features() {
        // 2024-01-01 is a Monday
        let records = vec![
            SensorRecord::new(ts(1, 14), 20.0, 60.0, 1.0, false, ApplianceStatus::On),
            SensorRecord::new(ts(7, 3), 20.0, 60.0, 1.0, false, ApplianceStatus::On),
        ];
        let prepared = DataPreparer::new()
            .prepare(&SensorTable::from_records(&records))
            .unwrap();
        let table = prepared.table;

        assert_eq!(table.row(0)[6], Value::Int(14));
        assert_eq!(table.row(0)[7], Value::Int(0));
        assert_eq!(table.row(0)[8], Value::Text("Monday".to_string()));
        assert_eq!(table.row(1)[6], Value::Int(3));
        assert_eq!(table.row(1)[7], Value::Int(6));
        assert_eq!(table.row(1)[8], Value::Text("Sunday".to_string()));
        assert_eq!(
            table.column_names()[6..].to_vec(),
            vec!["hour", "day_of_week", "day_name", "is_peak_hour"]
        );
    }

    #[test]
    fn test_parses_text_timestamps() {
        let table = SensorTable::from_columns(vec![
            Column::new(
                "timestamp",
                ColumnData::Text(vec![Some("2024-01-02 05:00:00".to_string()), None]),
            ),
            Column::new("energy_usage", ColumnData::Float(vec![Some(1.0), Some(2.0)])),
        ])
        .unwrap();

        let prepared = DataPreparer::new().prepare(&table).unwrap();
        let table = prepared.table;

        assert_eq!(table.column("timestamp").unwrap().column_type().name(), "datetime");
        assert_eq!(table.row(0)[2], Value::Int(5));
        assert_eq!(table.row(1)[2], Value::Null);
        assert_eq!(table.row(1)[4], Value::Null);
    }

    #[test]
    fn test_bad_timestamp_text_fails() {
        let table = SensorTable::from_columns(vec![Column::new(
            "timestamp",
            ColumnData::Text(vec![Some("not a time".to_string())]),
        )])
        .unwrap();

        let err = DataPreparer::new().prepare(&table).unwrap_err();
        assert!(matches!(err, ProcessingError::InvalidTimestamp { .. }));
    }

    #[test]
    fn test_without_timestamp_skips_features() {
        let table = SensorTable::from_columns(vec![Column::new(
            "energy_usage",
            ColumnData::Float(vec![Some(1.0), Some(1.0), Some(3.0)]),
        )])
        .unwrap();

        let prepared = DataPreparer::new().prepare(&table).unwrap();
        assert_eq!(prepared.table.column_names(), vec!["energy_usage"]);
        assert_eq!(prepared.duplicates_removed, 1);
        assert_eq!(prepared.peak_threshold, None);
    }

    #[test]
    fn test_second_pass_is_noop() {
        let mut records: Vec<SensorRecord> = (0..6).map(|h| record(h, h as f64 * 0.5)).collect();
        records[2].energy_usage = None;
        records.push(records[4].clone());

        let preparer = DataPreparer::new();
        let first = preparer.prepare(&SensorTable::from_records(&records)).unwrap();
        let second = preparer.prepare(&first.table).unwrap();

        assert_eq!(second.table, first.table);
        assert_eq!(second.duplicates_removed, 0);
        assert_eq!(second.missing_values_filled, 0);
    }

    #[test]
    fn test_row_repeated_three_times() {
        let records = vec![record(0, 1.0), record(0, 1.0), record(0, 1.0), record(1, 2.0)];

        let prepared = DataPreparer::new()
            .prepare(&SensorTable::from_records(&records))
            .unwrap();

        assert_eq!(prepared.table.num_rows(), 2);
        assert_eq!(prepared.duplicates_removed, 2);
        assert_eq!(prepared.table.row(0)[0], Value::Timestamp(ts(1, 0)));
        assert_eq!(prepared.table.row(1)[0], Value::Timestamp(ts(1, 1)));
    }

    #[test]
    fn test_missing_timestamp_second_pass_fills_nothing() {
        let table = SensorTable::from_columns(vec![
            Column::new("timestamp", ColumnData::Timestamp(vec![Some(ts(1, 3)), None])),
            Column::new("energy_usage", ColumnData::Float(vec![Some(1.0), None])),
        ])
        .unwrap();

        let preparer = DataPreparer::new();
        let first = preparer.prepare(&table).unwrap();
        assert_eq!(first.missing_values_filled, 1);
        assert_eq!(first.table.column("hour").unwrap().missing_count(), 1);

        let second = preparer.prepare(&first.table).unwrap();
        assert_eq!(second.missing_values_filled, 0);
        assert_eq!(second.table, first.table);
    }
}
