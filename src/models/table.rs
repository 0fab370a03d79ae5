use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashSet;

use crate::error::{ProcessingError, Result};
use crate::models::SensorRecord;
use crate::utils::constants::{
    COL_APPLIANCE_STATUS, COL_ENERGY_USAGE, COL_HUMIDITY, COL_MOTION_DETECTED, COL_TEMPERATURE,
    COL_TIMESTAMP,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnType {
    Timestamp,
    Float,
    Int,
    Bool,
    Text,
}

impl ColumnType {
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Timestamp => "datetime",
            ColumnType::Float => "float64",
            ColumnType::Int => "int64",
            ColumnType::Bool => "bool",
            ColumnType::Text => "string",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Float | ColumnType::Int)
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single typed cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Timestamp(NaiveDateTime),
    Float(f64),
    Int(i64),
    Bool(bool),
    Text(String),
}

/// Typed column storage; `None` marks a missing cell
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Timestamp(Vec<Option<NaiveDateTime>>),
    Float(Vec<Option<f64>>),
    Int(Vec<Option<i64>>),
    Bool(Vec<Option<bool>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Timestamp(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Int(v) => v.len(),
            ColumnData::Bool(v) => v.len(),
            ColumnData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            ColumnData::Timestamp(_) => ColumnType::Timestamp,
            ColumnData::Float(_) => ColumnType::Float,
            ColumnData::Int(_) => ColumnType::Int,
            ColumnData::Bool(_) => ColumnType::Bool,
            ColumnData::Text(_) => ColumnType::Text,
        }
    }

    pub fn missing_count(&self) -> usize {
        match self {
            ColumnData::Timestamp(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Float(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Int(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Bool(v) => v.iter().filter(|c| c.is_none()).count(),
            ColumnData::Text(v) => v.iter().filter(|c| c.is_none()).count(),
        }
    }

    pub fn value(&self, row: usize) -> Value {
        match self {
            ColumnData::Timestamp(v) => v
                .get(row)
                .copied()
                .flatten()
                .map_or(Value::Null, Value::Timestamp),
            ColumnData::Float(v) => v
                .get(row)
                .copied()
                .flatten()
                .map_or(Value::Null, Value::Float),
            ColumnData::Int(v) => v
                .get(row)
                .copied()
                .flatten()
                .map_or(Value::Null, Value::Int),
            ColumnData::Bool(v) => v
                .get(row)
                .copied()
                .flatten()
                .map_or(Value::Null, Value::Bool),
            ColumnData::Text(v) => v
                .get(row)
                .cloned()
                .flatten()
                .map_or(Value::Null, Value::Text),
        }
    }

    /// Numeric view of the column, integers widened to `f64`
    pub fn as_f64(&self) -> Option<Vec<Option<f64>>> {
        match self {
            ColumnData::Float(v) => Some(v.clone()),
            ColumnData::Int(v) => Some(v.iter().map(|c| c.map(|i| i as f64)).collect()),
            _ => None,
        }
    }

    /// New column holding the given rows, in the given order
    pub fn take(&self, rows: &[usize]) -> Self {
        fn pick<T: Clone>(values: &[Option<T>], rows: &[usize]) -> Vec<Option<T>> {
            rows.iter()
                .map(|&i| values.get(i).cloned().flatten())
                .collect()
        }

        match self {
            ColumnData::Timestamp(v) => ColumnData::Timestamp(pick(v, rows)),
            ColumnData::Float(v) => ColumnData::Float(pick(v, rows)),
            ColumnData::Int(v) => ColumnData::Int(pick(v, rows)),
            ColumnData::Bool(v) => ColumnData::Bool(pick(v, rows)),
            ColumnData::Text(v) => ColumnData::Text(pick(v, rows)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Hashable form of a cell, used to find fully identical rows
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CellKey {
    Null,
    Timestamp(NaiveDateTime),
    Float(u64),
    Int(i64),
    Bool(bool),
    Text(String),
}

impl From<Value> for CellKey {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => CellKey::Null,
            Value::Timestamp(t) => CellKey::Timestamp(t),
            // -0.0 == 0.0 and all NaNs compare equal for duplicate detection
            Value::Float(f) if f == 0.0 => CellKey::Float(0.0f64.to_bits()),
            Value::Float(f) if f.is_nan() => CellKey::Float(f64::NAN.to_bits()),
            Value::Float(f) => CellKey::Float(f.to_bits()),
            Value::Int(i) => CellKey::Int(i),
            Value::Bool(b) => CellKey::Bool(b),
            Value::Text(s) => CellKey::Text(s),
        }
    }
}

/// Columnar sensor table. All columns have the same length and unique names.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SensorTable {
    columns: Vec<Column>,
}

impl SensorTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let mut table = Self::new();
        for column in columns {
            if table.has_column(&column.name) {
                return Err(ProcessingError::InvalidFormat(format!(
                    "Duplicate column name: '{}'",
                    column.name
                )));
            }
            table.set_column(column.name, column.data)?;
        }
        Ok(table)
    }

    /// Build the six source columns from typed records
    pub fn from_records(records: &[SensorRecord]) -> Self {
        let columns = vec![
            Column::new(
                COL_TIMESTAMP,
                ColumnData::Timestamp(records.iter().map(|r| Some(r.timestamp)).collect()),
            ),
            Column::new(
                COL_TEMPERATURE,
                ColumnData::Float(records.iter().map(|r| r.temperature).collect()),
            ),
            Column::new(
                COL_HUMIDITY,
                ColumnData::Float(records.iter().map(|r| r.humidity).collect()),
            ),
            Column::new(
                COL_ENERGY_USAGE,
                ColumnData::Float(records.iter().map(|r| r.energy_usage).collect()),
            ),
            Column::new(
                COL_MOTION_DETECTED,
                ColumnData::Int(
                    records
                        .iter()
                        .map(|r| Some(i64::from(r.motion_detected)))
                        .collect(),
                ),
            ),
            Column::new(
                COL_APPLIANCE_STATUS,
                ColumnData::Text(
                    records
                        .iter()
                        .map(|r| Some(r.appliance_status.as_str().to_string()))
                        .collect(),
                ),
            ),
        ];

        Self { columns }
    }

    pub fn num_rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.data.len())
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column(&self, name: &str) -> Option<&ColumnData> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.data)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut ColumnData> {
        self.columns
            .iter_mut()
            .find(|c| c.name == name)
            .map(|c| &mut c.data)
    }

    /// Column lookup that fails with a schema error naming the column
    pub fn require(&self, name: &str) -> Result<&ColumnData> {
        self.column(name)
            .ok_or_else(|| ProcessingError::missing_column(name))
    }

    /// Numeric column widened to `f64`
    pub fn numeric(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let data = self.require(name)?;
        data.as_f64().ok_or_else(|| ProcessingError::TypeMismatch {
            column: name.to_string(),
            expected: "numeric",
            found: data.column_type().name(),
        })
    }

    /// Insert a column, or replace an existing one of the same name in place
    pub fn set_column(&mut self, name: impl Into<String>, data: ColumnData) -> Result<()> {
        let name = name.into();

        if !self.columns.is_empty() && data.len() != self.num_rows() {
            return Err(ProcessingError::InvalidFormat(format!(
                "Column '{}' has {} rows, table has {}",
                name,
                data.len(),
                self.num_rows()
            )));
        }

        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.data = data,
            None => self.columns.push(Column::new(name, data)),
        }

        Ok(())
    }

    pub fn row(&self, index: usize) -> Vec<Value> {
        self.columns.iter().map(|c| c.data.value(index)).collect()
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<Value>> + '_ {
        (0..self.num_rows()).map(move |i| self.row(i))
    }

    /// New table holding the given rows, in the given order
    pub fn take_rows(&self, rows: &[usize]) -> Self {
        Self {
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), c.data.take(rows)))
                .collect(),
        }
    }

    pub fn head(&self, n: usize) -> Self {
        let rows: Vec<usize> = (0..self.num_rows().min(n)).collect();
        self.take_rows(&rows)
    }

    pub fn missing_count(&self) -> usize {
        self.columns.iter().map(|c| c.data.missing_count()).sum()
    }

    /// Marks every row that is identical, across all columns, to an earlier row
    pub fn duplicated_mask(&self) -> Vec<bool> {
        let mut seen = HashSet::with_capacity(self.num_rows());
        self.rows()
            .map(|row| {
                let key: Vec<CellKey> = row.into_iter().map(CellKey::from).collect();
                !seen.insert(key)
            })
            .collect()
    }

    pub fn duplicate_count(&self) -> usize {
        self.duplicated_mask().iter().filter(|&&d| d).count()
    }

    /// Rows as JSON objects keyed by column name
    pub fn to_json_records(&self, limit: usize) -> Result<Vec<serde_json::Value>> {
        let names = self.column_names();
        self.rows()
            .take(limit)
            .map(|row| -> Result<serde_json::Value> {
                let mut object = serde_json::Map::with_capacity(names.len());
                for (name, value) in names.iter().zip(row) {
                    object.insert(name.to_string(), serde_json::to_value(value)?);
                }
                Ok(serde_json::Value::Object(object))
            })
            .collect()
    }
}
