pub mod synthetic;

pub use synthetic::{GeneratorConfig, SyntheticGenerator};

use crate::error::Result;
use crate::models::SensorTable;

/// Generate a synthetic dataset with the default defect rates
pub fn generate(num_days: u32, records_per_day: u32, seed: u64) -> Result<SensorTable> {
    SyntheticGenerator::new(GeneratorConfig::new(num_days, records_per_day, seed))?.generate()
}
