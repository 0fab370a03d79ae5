use crate::error::{ProcessingError, Result};
use crate::models::{
    ApplianceStatus, ChartData, ColumnData, DailyEnergy, HourlyEnergy, Insights, SensorTable,
    TemperatureSeries,
};
use crate::processors::statistics::{self, group_mean, present, round_to};
use crate::utils::constants::{
    COL_APPLIANCE_STATUS, COL_DAY_OF_WEEK, COL_ENERGY_USAGE, COL_HOUR, COL_HUMIDITY,
    COL_MOTION_DETECTED, COL_TEMPERATURE, COL_TIMESTAMP, DAY_NAMES, DEFAULT_CHART_POINTS,
    TIMESTAMP_CHART_FORMAT,
};

/// Dashboard aggregates over a cleaned table
pub struct InsightsAnalyzer {
    chart_points: usize,
}

impl InsightsAnalyzer {
    pub fn new() -> Self {
        Self {
            chart_points: DEFAULT_CHART_POINTS,
        }
    }

    pub fn with_chart_points(chart_points: usize) -> Self {
        Self { chart_points }
    }

    /// Scalar insights. Fails on an empty table, a missing column, or a
    /// numeric column without any values.
    pub fn summarize(&self, table: &SensorTable) -> Result<Insights> {
        if table.is_empty() {
            return Err(ProcessingError::EmptyTable);
        }
        let total = table.num_rows() as f64;

        let temperatures = required_values(table, COL_TEMPERATURE)?;
        let humidities = required_values(table, COL_HUMIDITY)?;
        let energies = required_values(table, COL_ENERGY_USAGE)?;

        let motion_sum = statistics::sum(&present(&table.numeric(COL_MOTION_DETECTED)?));
        let appliances_on = count_appliances_on(table)?;

        Ok(Insights {
            avg_temperature: round_to(mean_of(&temperatures), 1),
            min_temperature: round_to(min_of(&temperatures), 1),
            max_temperature: round_to(max_of(&temperatures), 1),
            avg_humidity: round_to(mean_of(&humidities), 1),
            total_energy: round_to(statistics::sum(&energies), 2),
            avg_energy: round_to(mean_of(&energies), 2),
            motion_detections: motion_sum.max(0.0) as u64,
            motion_percentage: round_to(motion_sum / total * 100.0, 1),
            peak_hour: self.peak_hour(table)?,
            appliances_on: appliances_on as u64,
            appliance_on_percentage: round_to(appliances_on as f64 / total * 100.0, 1),
        })
    }

    /// Hour of day with the highest mean energy usage; the lowest hour wins ties
    pub fn peak_hour(&self, table: &SensorTable) -> Result<u32> {
        let hourly = group_mean(&hour_keys(table)?, &table.numeric(COL_ENERGY_USAGE)?);

        let mut peak: Option<(i64, f64)> = None;
        for (hour, energy) in hourly {
            if peak.map_or(true, |(_, best)| energy > best) {
                peak = Some((hour, energy));
            }
        }

        let (hour, _) = peak.ok_or_else(|| {
            ProcessingError::DegenerateInput("no hourly energy readings".to_string())
        })?;
        u32::try_from(hour)
            .map_err(|_| ProcessingError::InvalidFormat(format!("Invalid hour value: {}", hour)))
    }

    /// Series for the temperature line chart and the energy bar charts
    pub fn chart_series(&self, table: &SensorTable) -> Result<ChartData> {
        if table.is_empty() {
            return Err(ProcessingError::EmptyTable);
        }
        required_values(table, COL_ENERGY_USAGE)?;

        Ok(ChartData {
            temperature: self.temperature_series(table)?,
            hourly_energy: self.hourly_energy(table)?,
            daily_energy: self.daily_energy(table)?,
        })
    }

    /// First readings in table order; sort upstream for a chronological series
    fn temperature_series(&self, table: &SensorTable) -> Result<TemperatureSeries> {
        let timestamps = match table.require(COL_TIMESTAMP)? {
            ColumnData::Timestamp(values) => values
                .iter()
                .take(self.chart_points)
                .map(|t| t.map(|t| t.format(TIMESTAMP_CHART_FORMAT).to_string()))
                .collect(),
            other => {
                return Err(ProcessingError::TypeMismatch {
                    column: COL_TIMESTAMP.to_string(),
                    expected: "datetime",
                    found: other.column_type().name(),
                })
            }
        };

        let values = table
            .numeric(COL_TEMPERATURE)?
            .into_iter()
            .take(self.chart_points)
            .collect();

        Ok(TemperatureSeries { timestamps, values })
    }

    fn hourly_energy(&self, table: &SensorTable) -> Result<HourlyEnergy> {
        let hourly = group_mean(&hour_keys(table)?, &table.numeric(COL_ENERGY_USAGE)?);

        let mut hours = Vec::with_capacity(hourly.len());
        let mut values = Vec::with_capacity(hourly.len());
        for (hour, energy) in hourly {
            hours.push(u32::try_from(hour).map_err(|_| {
                ProcessingError::InvalidFormat(format!("Invalid hour value: {}", hour))
            })?);
            values.push(energy);
        }

        Ok(HourlyEnergy { hours, values })
    }

    fn daily_energy(&self, table: &SensorTable) -> Result<DailyEnergy> {
        let keys = int_column(table, COL_DAY_OF_WEEK)?;
        let daily = group_mean(&keys, &table.numeric(COL_ENERGY_USAGE)?);

        Ok(DailyEnergy {
            days: DAY_NAMES.iter().map(|d| d.to_string()).collect(),
            values: (0..DAY_NAMES.len() as i64)
                .map(|day| daily.get(&day).copied())
                .collect(),
        })
    }
}

impl Default for InsightsAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-missing values of a numeric column, failing if there are none
fn required_values(table: &SensorTable, column: &str) -> Result<Vec<f64>> {
    let values = present(&table.numeric(column)?);
    if values.is_empty() {
        return Err(ProcessingError::DegenerateInput(format!(
            "column '{}' has no values",
            column
        )));
    }
    Ok(values)
}

// Callers pass non-empty slices from `required_values`
fn mean_of(values: &[f64]) -> f64 {
    statistics::mean(values).unwrap_or(f64::NAN)
}

fn min_of(values: &[f64]) -> f64 {
    statistics::min(values).unwrap_or(f64::NAN)
}

fn max_of(values: &[f64]) -> f64 {
    statistics::max(values).unwrap_or(f64::NAN)
}

fn int_column(table: &SensorTable, column: &str) -> Result<Vec<Option<i64>>> {
    match table.require(column)? {
        ColumnData::Int(values) => Ok(values.clone()),
        other => Err(ProcessingError::TypeMismatch {
            column: column.to_string(),
            expected: "int64",
            found: other.column_type().name(),
        }),
    }
}

fn hour_keys(table: &SensorTable) -> Result<Vec<Option<i64>>> {
    int_column(table, COL_HOUR)
}

fn count_appliances_on(table: &SensorTable) -> Result<usize> {
    match table.require(COL_APPLIANCE_STATUS)? {
        ColumnData::Text(values) => Ok(values
            .iter()
            .flatten()
            .filter_map(|v| ApplianceStatus::parse(v).ok())
            .filter(ApplianceStatus::is_on)
            .count()),
        other => Err(ProcessingError::TypeMismatch {
            column: COL_APPLIANCE_STATUS.to_string(),
            expected: "string",
            found: other.column_type().name(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Column, SensorRecord};
    use crate::processors::DataPreparer;
    use chrono::{NaiveDate, NaiveDateTime};
    use pretty_assertions::assert_eq;

    fn ts(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    /// One Monday of readings: temperature = 15 + hour * 0.5,
    /// energy = 1.0 except 3.0 at 18:00 and 19:00, motion every third hour,
    /// appliances ON for hours 6..=17.
    fn single_day() -> SensorTable {
        let records: Vec<SensorRecord> = (0..24)
            .map(|hour| {
                let energy = if hour == 18 || hour == 19 { 3.0 } else { 1.0 };
                let status = if (6..=17).contains(&hour) {
                    ApplianceStatus::On
                } else {
                    ApplianceStatus::Off
                };
                SensorRecord::new(
                    ts(1, hour),
                    15.0 + hour as f64 * 0.5,
                    50.0 + hour as f64,
                    energy,
                    hour % 3 == 0,
                    status,
                )
            })
            .collect();

        DataPreparer::new()
            .prepare(&SensorTable::from_records(&records))
            .unwrap()
            .table
    }

    #[test]
    fn test_summarize_single_day() {
        let insights = InsightsAnalyzer::new().summarize(&single_day()).unwrap();

        assert_eq!(
            insights,
            Insights {
                // mean of 15.0..=26.5 step 0.5
                avg_temperature: 20.8,
                min_temperature: 15.0,
                max_temperature: 26.5,
                avg_humidity: 61.5,
                total_energy: 28.0,
                avg_energy: 1.17,
                motion_detections: 8,
                motion_percentage: 33.3,
                peak_hour: 18,
                appliances_on: 12,
                appliance_on_percentage: 50.0,
            }
        );
    }

    #[test]
    fn test_empty_table_fails() {
        let empty = single_day().head(0);
        assert!(matches!(
            InsightsAnalyzer::new().summarize(&empty),
            Err(ProcessingError::EmptyTable)
        ));
    }

    #[test]
    fn test_missing_column_fails() {
        let table = SensorTable::from_columns(vec![Column::new(
            "temperature",
            ColumnData::Float(vec![Some(20.0)]),
        )])
        .unwrap();

        match InsightsAnalyzer::new().summarize(&table) {
            Err(ProcessingError::MissingColumn { column }) => assert_eq!(column, "humidity"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_all_missing_column_fails() {
        let mut table = single_day();
        table
            .set_column("humidity", ColumnData::Float(vec![None; 24]))
            .unwrap();

        assert!(matches!(
            InsightsAnalyzer::new().summarize(&table),
            Err(ProcessingError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_peak_hour_tie_takes_lowest_hour() {
        let mut table = single_day();
        let mut energy = vec![Some(1.0); 24];
        energy[5] = Some(4.0);
        energy[20] = Some(4.0);
        table
            .set_column("energy_usage", ColumnData::Float(energy))
            .unwrap();

        assert_eq!(InsightsAnalyzer::new().peak_hour(&table).unwrap(), 5);
    }

    #[test]
    fn test_chart_series() {
        let charts = InsightsAnalyzer::with_chart_points(3)
            .chart_series(&single_day())
            .unwrap();

        assert_eq!(
            charts.temperature.timestamps,
            vec![
                Some("2024-01-01 00:00".to_string()),
                Some("2024-01-01 01:00".to_string()),
                Some("2024-01-01 02:00".to_string()),
            ]
        );
        assert_eq!(charts.temperature.values, vec![Some(15.0), Some(15.5), Some(16.0)]);

        assert_eq!(charts.hourly_energy.hours, (0..24).collect::<Vec<u32>>());
        assert_eq!(charts.hourly_energy.values[18], 3.0);

        assert_eq!(charts.daily_energy.days.len(), 7);
        assert_eq!(charts.daily_energy.days[0], "Monday");
        let mut expected_daily = vec![None; 7];
        expected_daily[0] = Some(28.0 / 24.0);
        assert_eq!(charts.daily_energy.values, expected_daily);
    }

    #[test]
    fn test_chart_series_requires_features() {
        let raw = SensorTable::from_records(&[SensorRecord::new(
            ts(1, 0),
            20.0,
            50.0,
            1.0,
            false,
            ApplianceStatus::Off,
        )]);

        assert!(matches!(
            InsightsAnalyzer::new().chart_series(&raw),
            Err(ProcessingError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_chart_series_degenerate_input_fails() {
        let analyzer = InsightsAnalyzer::new();

        assert!(matches!(
            analyzer.chart_series(&single_day().head(0)),
            Err(ProcessingError::EmptyTable)
        ));

        let mut table = single_day();
        table
            .set_column("energy_usage", ColumnData::Float(vec![None; 24]))
            .unwrap();
        assert!(matches!(
            analyzer.chart_series(&table),
            Err(ProcessingError::DegenerateInput(_))
        ));
    }
}
