pub mod sensor_reader;

pub use sensor_reader::SensorReader;

use crate::error::Result;
use crate::models::SensorTable;
use std::path::Path;

/// Load a sensor CSV file, `Ok(None)` if it does not exist
pub fn load(path: &Path) -> Result<Option<SensorTable>> {
    SensorReader::new().load(path)
}
