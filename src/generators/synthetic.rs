use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use rand::rngs::StdRng;
use rand::seq::{index, SliceRandom};
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;
use validator::Validate;

use crate::error::{ProcessingError, Result};
use crate::models::{ApplianceStatus, SensorRecord, SensorTable};
use crate::utils::constants::*;

/// Parameters of a synthetic smart home dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GeneratorConfig {
    #[validate(range(min = 1, max = 3650))]
    pub num_days: u32,

    #[validate(range(min = 1, max = 1440))]
    pub records_per_day: u32,

    pub seed: u64,

    /// First hourly timestamp
    pub start: NaiveDateTime,

    /// Share of rows in the pool that missing values are drawn from
    #[validate(range(min = 0.0, max = 1.0))]
    pub missing_fraction: f64,

    /// Share of rows appended again as exact duplicates
    #[validate(range(min = 0.0, max = 1.0))]
    pub duplicate_fraction: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_days: DEFAULT_NUM_DAYS,
            records_per_day: DEFAULT_RECORDS_PER_DAY,
            seed: DEFAULT_SEED,
            start: default_start(),
            missing_fraction: DEFAULT_MISSING_FRACTION,
            duplicate_fraction: DEFAULT_DUPLICATE_FRACTION,
        }
    }
}

fn default_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

impl GeneratorConfig {
    pub fn new(num_days: u32, records_per_day: u32, seed: u64) -> Self {
        Self {
            num_days,
            records_per_day,
            seed,
            ..Self::default()
        }
    }

    pub fn total_records(&self) -> usize {
        self.num_days as usize * self.records_per_day as usize
    }

    /// Size of the shared pool of rows that receive missing values
    pub fn missing_pool_size(&self) -> usize {
        (self.total_records() as f64 * self.missing_fraction).floor() as usize
    }

    /// Number of duplicate rows appended before shuffling
    pub fn duplicate_count(&self) -> usize {
        (self.total_records() as f64 * self.duplicate_fraction).floor() as usize
    }

    /// Row count of the generated table
    pub fn expected_rows(&self) -> usize {
        self.total_records() + self.duplicate_count()
    }
}

/// Produces hourly smart home readings with diurnal patterns and injected
/// data quality defects (missing values and duplicate rows).
pub struct SyntheticGenerator {
    config: GeneratorConfig,
}

struct NoiseModel {
    temperature: Normal<f64>,
    humidity: Normal<f64>,
    day_energy: Normal<f64>,
    night_energy: Normal<f64>,
}

impl NoiseModel {
    fn new() -> Result<Self> {
        Ok(Self {
            temperature: normal(0.0, TEMP_NOISE_STD)?,
            humidity: normal(0.0, HUMIDITY_NOISE_STD)?,
            day_energy: normal(DAY_ENERGY_MEAN, DAY_ENERGY_STD)?,
            night_energy: normal(NIGHT_ENERGY_MEAN, NIGHT_ENERGY_STD)?,
        })
    }
}

fn normal(mean: f64, std_dev: f64) -> Result<Normal<f64>> {
    Normal::new(mean, std_dev).map_err(|e| ProcessingError::Generation(e.to_string()))
}

fn in_window(hour: u32, window: (u32, u32)) -> bool {
    (window.0..=window.1).contains(&hour)
}

impl SyntheticGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Generate with a generator seeded from the configured seed
    pub fn generate(&self) -> Result<SensorTable> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        self.generate_with_rng(&mut rng)
    }

    /// Generate drawing every random value from `rng`
    pub fn generate_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<SensorTable> {
        let mut records = self.base_records(rng)?;
        let missing = self.inject_missing_values(&mut records, rng);
        let duplicates = self.inject_duplicates(&mut records, rng);
        records.shuffle(rng);

        debug!(
            rows = records.len(),
            missing,
            duplicates,
            seed = self.config.seed,
            "Generated synthetic sensor data"
        );

        Ok(SensorTable::from_records(&records))
    }

    /// Clean readings; each signal is drawn for the whole time axis before the next
    fn base_records<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<SensorRecord>> {
        let noise = NoiseModel::new()?;
        let total = self.config.total_records();

        let timestamps: Vec<NaiveDateTime> = (0..total)
            .map(|i| self.config.start + Duration::hours(i as i64))
            .collect();
        let hours: Vec<u32> = timestamps.iter().map(|t| t.hour()).collect();

        let temperatures: Vec<f64> = hours
            .iter()
            .map(|&hour| {
                let cycle = TEMP_BASE + TEMP_AMPLITUDE * ((hour as f64 - 6.0) * PI / 12.0).sin();
                (cycle + noise.temperature.sample(rng)).clamp(MIN_TEMP, MAX_TEMP)
            })
            .collect();

        let humidities: Vec<f64> = temperatures
            .iter()
            .map(|&temp| {
                let base = HUMIDITY_BASE - (temp - TEMP_BASE) * HUMIDITY_TEMP_SLOPE;
                (base + noise.humidity.sample(rng)).clamp(MIN_HUMIDITY, MAX_HUMIDITY)
            })
            .collect();

        let energies: Vec<f64> = hours
            .iter()
            .map(|&hour| {
                let usage = if in_window(hour, ENERGY_DAY_HOURS) {
                    noise.day_energy.sample(rng)
                } else {
                    noise.night_energy.sample(rng)
                };
                usage.max(MIN_ENERGY)
            })
            .collect();

        let motions: Vec<bool> = hours
            .iter()
            .map(|&hour| {
                let p = if in_window(hour, MOTION_DAY_HOURS) {
                    DAY_MOTION_PROBABILITY
                } else {
                    NIGHT_MOTION_PROBABILITY
                };
                rng.gen::<f64>() < p
            })
            .collect();

        let statuses: Vec<ApplianceStatus> = energies
            .iter()
            .map(|&energy| {
                let p = if energy > HIGH_ENERGY_THRESHOLD {
                    HIGH_ENERGY_ON_PROBABILITY
                } else {
                    LOW_ENERGY_ON_PROBABILITY
                };
                if rng.gen::<f64>() < p {
                    ApplianceStatus::On
                } else {
                    ApplianceStatus::Off
                }
            })
            .collect();

        Ok((0..total)
            .map(|i| {
                SensorRecord::new(
                    timestamps[i],
                    temperatures[i],
                    humidities[i],
                    energies[i],
                    motions[i],
                    statuses[i],
                )
            })
            .collect())
    }

    /// Null a third of a shared random row pool in each numeric column,
    /// drawn independently per column. Returns the number of cells cleared.
    fn inject_missing_values<R: Rng + ?Sized>(&self, records: &mut [SensorRecord], rng: &mut R) -> usize {
        let pool_size = self.config.missing_pool_size().min(records.len());
        let pool = index::sample(rng, records.len(), pool_size).into_vec();
        let per_column = pool.len() / 3;

        let setters: [fn(&mut SensorRecord); 3] = [
            |r| r.temperature = None,
            |r| r.humidity = None,
            |r| r.energy_usage = None,
        ];

        let mut cleared = 0;
        for clear in setters {
            for &row in pool.choose_multiple(rng, per_column) {
                clear(&mut records[row]);
                cleared += 1;
            }
        }

        cleared
    }

    /// Append copies of randomly chosen original rows
    fn inject_duplicates<R: Rng + ?Sized>(&self, records: &mut Vec<SensorRecord>, rng: &mut R) -> usize {
        let count = self.config.duplicate_count().min(records.len());
        let rows = index::sample(rng, records.len(), count);

        let copies: Vec<SensorRecord> = rows.iter().map(|i| records[i].clone()).collect();
        records.extend(copies);

        count
    }
}
