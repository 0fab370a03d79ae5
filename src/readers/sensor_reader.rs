use crate::error::Result;
use crate::models::{Column, ColumnData, SensorTable};
use crate::utils::constants::COL_TIMESTAMP;
use crate::utils::timestamps::parse_timestamp;
use std::path::Path;
use tracing::debug;

/// Reads delimited sensor files into a [`SensorTable`].
///
/// The `timestamp` column is parsed into temporal values; every other column
/// gets the narrowest type its cells allow (int, float, bool, then text).
/// Empty cells and `NaN` are treated as missing.
pub struct SensorReader {
    delimiter: u8,
}

impl SensorReader {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }

    /// Load a sensor file. Returns `Ok(None)` when the file does not exist.
    pub fn load(&self, path: &Path) -> Result<Option<SensorTable>> {
        if !path.exists() {
            debug!(path = %path.display(), "Sensor data file not found");
            return Ok(None);
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .from_path(path)?;

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];

        for record in reader.records() {
            let record = record?;
            for (column, field) in cells.iter_mut().zip(record.iter()) {
                column.push(field.to_string());
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, raw)| -> Result<Column> {
                let data = if name == COL_TIMESTAMP {
                    parse_timestamp_column(&raw)?
                } else {
                    infer_column(&raw)
                };
                Ok(Column::new(name, data))
            })
            .collect::<Result<Vec<_>>>()?;

        let table = SensorTable::from_columns(columns)?;
        debug!(
            path = %path.display(),
            rows = table.num_rows(),
            columns = table.num_columns(),
            "Loaded sensor table"
        );

        Ok(Some(table))
    }
}

impl Default for SensorReader {
    fn default() -> Self {
        Self::new()
    }
}

fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || cell.eq_ignore_ascii_case("nan")
}

fn parse_timestamp_column(raw: &[String]) -> Result<ColumnData> {
    let values = raw
        .iter()
        .map(|cell| {
            if is_missing(cell) {
                Ok(None)
            } else {
                parse_timestamp(cell).map(Some)
            }
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(ColumnData::Timestamp(values))
}

fn parse_bool(cell: &str) -> Option<bool> {
    match cell.trim() {
        "True" | "true" | "TRUE" => Some(true),
        "False" | "false" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Pick the narrowest type that holds every non-missing cell.
///
/// Integer columns must be gap-free; a column of integers with gaps is read
/// as float so that imputed medians fit.
fn infer_column(raw: &[String]) -> ColumnData {
    let present: Vec<&str> = raw
        .iter()
        .map(String::as_str)
        .filter(|cell| !is_missing(cell))
        .collect();
    let has_gaps = present.len() < raw.len();

    if !has_gaps && !present.is_empty() {
        let ints: Option<Vec<i64>> = present.iter().map(|c| c.trim().parse().ok()).collect();
        if let Some(ints) = ints {
            return ColumnData::Int(ints.into_iter().map(Some).collect());
        }
    }

    if present.iter().all(|c| c.trim().parse::<f64>().is_ok()) {
        return ColumnData::Float(
            raw.iter()
                .map(|c| {
                    if is_missing(c) {
                        None
                    } else {
                        c.trim().parse().ok()
                    }
                })
                .collect(),
        );
    }

    if present.iter().all(|c| parse_bool(c).is_some()) {
        return ColumnData::Bool(
            raw.iter()
                .map(|c| if is_missing(c) { None } else { parse_bool(c) })
                .collect(),
        );
    }

    ColumnData::Text(
        raw.iter()
            .map(|c| if is_missing(c) { None } else { Some(c.clone()) })
            .collect(),
    )
}
