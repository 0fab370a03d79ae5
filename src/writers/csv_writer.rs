use crate::error::Result;
use crate::models::{SensorTable, Value};
use crate::utils::constants::TIMESTAMP_WRITE_FORMAT;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Writes a [`SensorTable`] as a flat CSV file with a header row.
///
/// Missing cells are written empty and floats in their shortest round-trip
/// form, so [`crate::readers::SensorReader`] reads back an identical table.
pub struct CsvWriter {
    delimiter: u8,
}

impl CsvWriter {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    pub fn write_table(&self, table: &SensorTable, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(path)?;
        self.write_to(table, file)?;

        debug!(
            path = %path.display(),
            rows = table.num_rows(),
            "Wrote sensor table"
        );

        Ok(())
    }

    pub fn write_to<W: Write>(&self, table: &SensorTable, writer: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        writer.write_record(table.column_names())?;
        for row in table.rows() {
            writer.write_record(row.iter().map(format_value))?;
        }
        writer.flush()?;

        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}

pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Timestamp(t) => t.format(TIMESTAMP_WRITE_FORMAT).to_string(),
        // Debug keeps the fractional part ("15.0"), so floats never read back as ints
        Value::Float(f) => format!("{:?}", f),
        Value::Int(i) => i.to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Text(s) => s.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApplianceStatus, ColumnData, SensorRecord};
    use chrono::NaiveDate;

    #[test]
    fn test_format_value() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap();

        assert_eq!(format_value(&Value::Null), "");
        assert_eq!(format_value(&Value::Timestamp(ts)), "2024-01-01 06:00:00");
        assert_eq!(format_value(&Value::Float(15.0)), "15.0");
        assert_eq!(format_value(&Value::Float(0.1)), "0.1");
        assert_eq!(format_value(&Value::Int(1)), "1");
        assert_eq!(format_value(&Value::Bool(true)), "True");
        assert_eq!(format_value(&Value::Text("ON".to_string())), "ON");
    }

    #[test]
    fn test_write_to_buffer() -> Result<()> {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut record = SensorRecord::new(ts, 18.25, 61.0, 0.8, true, ApplianceStatus::On);
        record.humidity = None;

        let mut table = SensorTable::from_records(&[record]);
        table.set_column("is_peak_hour", ColumnData::Bool(vec![Some(false)]))?;

        let mut buffer = Vec::new();
        CsvWriter::new().write_to(&table, &mut buffer)?;
        let text = String::from_utf8(buffer).unwrap();

        assert_eq!(
            text,
            "timestamp,temperature,humidity,energy_usage,motion_detected,appliance_status,is_peak_hour\n\
             2024-01-01 00:00:00,18.25,,0.8,1,ON,False\n"
        );

        Ok(())
    }
}
