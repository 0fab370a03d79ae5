use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{ProcessingError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApplianceStatus {
    On,
    Off,
}

impl ApplianceStatus {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim() {
            "ON" => Ok(ApplianceStatus::On),
            "OFF" => Ok(ApplianceStatus::Off),
            other => Err(ProcessingError::InvalidFormat(format!(
                "Invalid appliance status: '{}'",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApplianceStatus::On => "ON",
            ApplianceStatus::Off => "OFF",
        }
    }

    pub fn is_on(&self) -> bool {
        matches!(self, ApplianceStatus::On)
    }
}

impl std::fmt::Display for ApplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One hourly reading from a smart home hub
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SensorRecord {
    pub timestamp: NaiveDateTime,

    // °C
    #[validate(range(min = -50.0, max = 60.0))]
    pub temperature: Option<f64>,

    // %
    #[validate(range(min = 0.0, max = 100.0))]
    pub humidity: Option<f64>,

    // kWh
    #[validate(range(min = 0.0))]
    pub energy_usage: Option<f64>,

    #[validate(range(max = 1))]
    pub motion_detected: u8,

    pub appliance_status: ApplianceStatus,
}

impl SensorRecord {
    pub fn new(
        timestamp: NaiveDateTime,
        temperature: f64,
        humidity: f64,
        energy_usage: f64,
        motion_detected: bool,
        appliance_status: ApplianceStatus,
    ) -> Self {
        Self {
            timestamp,
            temperature: Some(temperature),
            humidity: Some(humidity),
            energy_usage: Some(energy_usage),
            motion_detected: u8::from(motion_detected),
            appliance_status,
        }
    }
}
