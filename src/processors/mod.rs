pub mod data_preparer;
pub mod statistics;

pub use data_preparer::{DataPreparer, PreparedData};

use crate::error::Result;
use crate::models::SensorTable;

/// Run the default preparation pipeline over a raw table
pub fn prepare(raw: &SensorTable) -> Result<PreparedData> {
    DataPreparer::new().prepare(raw)
}
