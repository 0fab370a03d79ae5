use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::error::Result;
use crate::generators::GeneratorConfig;
use crate::utils::constants::{
    DEFAULT_CHART_POINTS, DEFAULT_DATA_FILE, DEFAULT_RECORD_LIMIT, DEFAULT_SAMPLE_ROWS,
};

/// Prefix for environment overrides, e.g. `SENSOR__GENERATOR__SEED=7`
pub const ENV_PREFIX: &str = "SENSOR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DisplayConfig {
    /// Raw rows shown by the exploration view
    pub sample_rows: usize,

    /// Points in the temperature chart
    #[validate(range(min = 1))]
    pub chart_points: usize,

    /// Rows included in JSON record exports
    pub record_limit: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            sample_rows: DEFAULT_SAMPLE_ROWS,
            chart_points: DEFAULT_CHART_POINTS,
            record_limit: DEFAULT_RECORD_LIMIT,
        }
    }
}

/// Settings handed explicitly to every command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    pub data_file: PathBuf,

    #[validate(nested)]
    pub generator: GeneratorConfig,

    #[validate(nested)]
    pub display: DisplayConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            generator: GeneratorConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl AppConfig {
    /// Layer built-in defaults, an optional config file and `SENSOR__*`
    /// environment variables, then validate the result.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(file) = file {
            builder = builder.add_source(config::File::from(file).required(true));
        }

        let config: AppConfig = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.data_file, PathBuf::from("data/smart_home_sensor_data.csv"));
        assert_eq!(config.generator.num_days, 30);
        assert_eq!(config.generator.records_per_day, 24);
        assert_eq!(config.generator.seed, 42);
        assert_eq!(config.display.chart_points, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() -> Result<()> {
        let mut file = Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "data_file = \"custom/readings.csv\"")?;
        writeln!(file, "[generator]")?;
        writeln!(file, "num_days = 7")?;
        writeln!(file, "seed = 1234")?;

        let config = AppConfig::load(Some(file.path()))?;

        assert_eq!(config.data_file, PathBuf::from("custom/readings.csv"));
        assert_eq!(config.generator.num_days, 7);
        assert_eq!(config.generator.seed, 1234);
        assert_eq!(config.generator.records_per_day, 24);
        assert_eq!(config.display, DisplayConfig::default());

        Ok(())
    }

    #[test]
    fn test_invalid_file_values_rejected() -> Result<()> {
        let mut file = Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "[generator]")?;
        writeln!(file, "duplicate_fraction = 2.0")?;

        assert!(AppConfig::load(Some(file.path())).is_err());

        Ok(())
    }

    #[test]
    fn test_missing_config_file_fails() {
        assert!(AppConfig::load(Some(Path::new("no/such/config.toml"))).is_err());
    }
}
