/// Source column names
pub const COL_TIMESTAMP: &str = "timestamp";
pub const COL_TEMPERATURE: &str = "temperature";
pub const COL_HUMIDITY: &str = "humidity";
pub const COL_ENERGY_USAGE: &str = "energy_usage";
pub const COL_MOTION_DETECTED: &str = "motion_detected";
pub const COL_APPLIANCE_STATUS: &str = "appliance_status";

/// Derived column names
pub const COL_HOUR: &str = "hour";
pub const COL_DAY_OF_WEEK: &str = "day_of_week";
pub const COL_DAY_NAME: &str = "day_name";
pub const COL_IS_PEAK_HOUR: &str = "is_peak_hour";

/// Features computed from `timestamp`; never imputed
pub const DERIVED_COLUMNS: [&str; 2] = [COL_HOUR, COL_DAY_OF_WEEK];

/// Source columns in file order
pub const SENSOR_COLUMNS: [&str; 6] = [
    COL_TIMESTAMP,
    COL_TEMPERATURE,
    COL_HUMIDITY,
    COL_ENERGY_USAGE,
    COL_MOTION_DETECTED,
    COL_APPLIANCE_STATUS,
];

/// Monday = 0
pub const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// File names
pub const DEFAULT_DATA_FILE: &str = "data/smart_home_sensor_data.csv";

/// Timestamp formats
pub const TIMESTAMP_WRITE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const TIMESTAMP_CHART_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Preparation
pub const PEAK_USAGE_QUANTILE: f64 = 0.75;

/// Generator defaults
pub const DEFAULT_NUM_DAYS: u32 = 30;
pub const DEFAULT_RECORDS_PER_DAY: u32 = 24;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_MISSING_FRACTION: f64 = 0.05;
pub const DEFAULT_DUPLICATE_FRACTION: f64 = 0.02;

/// Temperature model (°C)
pub const TEMP_BASE: f64 = 20.0;
pub const TEMP_AMPLITUDE: f64 = 8.0;
pub const TEMP_NOISE_STD: f64 = 2.0;
pub const MIN_TEMP: f64 = 15.0;
pub const MAX_TEMP: f64 = 35.0;

/// Humidity model (%)
pub const HUMIDITY_BASE: f64 = 60.0;
pub const HUMIDITY_TEMP_SLOPE: f64 = 1.5;
pub const HUMIDITY_NOISE_STD: f64 = 5.0;
pub const MIN_HUMIDITY: f64 = 30.0;
pub const MAX_HUMIDITY: f64 = 90.0;

/// Energy model (kWh)
pub const DAY_ENERGY_MEAN: f64 = 2.5;
pub const DAY_ENERGY_STD: f64 = 0.5;
pub const NIGHT_ENERGY_MEAN: f64 = 0.8;
pub const NIGHT_ENERGY_STD: f64 = 0.3;
pub const MIN_ENERGY: f64 = 0.1;
pub const HIGH_ENERGY_THRESHOLD: f64 = 2.0;

/// Hour windows (inclusive)
pub const ENERGY_DAY_HOURS: (u32, u32) = (6, 22);
pub const MOTION_DAY_HOURS: (u32, u32) = (7, 22);

/// Bernoulli probabilities
pub const DAY_MOTION_PROBABILITY: f64 = 0.4;
pub const NIGHT_MOTION_PROBABILITY: f64 = 0.1;
pub const HIGH_ENERGY_ON_PROBABILITY: f64 = 0.8;
pub const LOW_ENERGY_ON_PROBABILITY: f64 = 0.3;

/// Display defaults
pub const DEFAULT_SAMPLE_ROWS: usize = 100;
pub const DEFAULT_CHART_POINTS: usize = 100;
pub const DEFAULT_RECORD_LIMIT: usize = 1000;
