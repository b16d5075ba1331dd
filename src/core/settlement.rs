//! Settlement policy
//!
//! Decides whether a committed work attestation releases payment or holds it.
//! The ledger only sees the `SettlementPolicy` trait; the concrete policy is
//! chosen by configuration through `SettlementMode`.

use crate::config::SettlementSettings;
use crate::core::block::{ContractRecord, SensorRecord, UNSET};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Settlement state of a committed block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Released,
    Locked,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Released => write!(f, "RELEASED"),
            Status::Locked => write!(f, "LOCKED"),
        }
    }
}

pub trait SettlementPolicy: Send + Sync {
    fn settle(&self, contract: &ContractRecord, sensor: &SensorRecord) -> Status;

    fn name(&self) -> &'static str;
}

/// Releases every commit regardless of its readings.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysRelease;

impl SettlementPolicy for AlwaysRelease {
    fn settle(&self, _contract: &ContractRecord, _sensor: &SensorRecord) -> Status {
        Status::Released
    }

    fn name(&self) -> &'static str {
        "always_release"
    }
}

/// Inclusive numeric range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn new(min: f64, max: f64) -> Self {
        Bounds { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Releases only when the declared work is real and every sensor reading
/// falls inside its configured range.
#[derive(Debug, Clone)]
pub struct SensorBounds {
    pub moisture: Bounds,
    pub ultrasonic: Bounds,
    pub temperature: Bounds,
}

impl SensorBounds {
    pub fn from_settings(settings: &SettlementSettings) -> Self {
        SensorBounds {
            moisture: settings.moisture,
            ultrasonic: settings.ultrasonic,
            temperature: settings.temperature,
        }
    }

    fn reading_within(raw: &str, bounds: &Bounds) -> bool {
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => bounds.contains(value),
            _ => false,
        }
    }
}

impl SettlementPolicy for SensorBounds {
    fn settle(&self, contract: &ContractRecord, sensor: &SensorRecord) -> Status {
        let work_declared = !contract.work.is_empty() && contract.work != UNSET;
        let quantity_declared = matches!(
            contract.qty.trim().parse::<f64>(),
            Ok(q) if q.is_finite() && q > 0.0
        );
        let readings_ok = Self::reading_within(&sensor.moisture, &self.moisture)
            && Self::reading_within(&sensor.ultrasonic, &self.ultrasonic)
            && Self::reading_within(&sensor.temperature, &self.temperature);

        if work_declared && quantity_declared && readings_ok {
            Status::Released
        } else {
            Status::Locked
        }
    }

    fn name(&self) -> &'static str {
        "sensor_bounds"
    }
}

/// Which policy the ledger settles with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementMode {
    #[default]
    AlwaysRelease,
    SensorBounds,
}

impl SettlementMode {
    pub fn build(&self, settings: &SettlementSettings) -> Box<dyn SettlementPolicy> {
        match self {
            SettlementMode::AlwaysRelease => Box::new(AlwaysRelease),
            SettlementMode::SensorBounds => Box::new(SensorBounds::from_settings(settings)),
        }
    }
}

impl FromStr for SettlementMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "always_release" => Ok(SettlementMode::AlwaysRelease),
            "sensor_bounds" => Ok(SettlementMode::SensorBounds),
            _ => Err(format!(
                "Invalid settlement mode: {s}. Valid options: always_release, sensor_bounds"
            )),
        }
    }
}

impl fmt::Display for SettlementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettlementMode::AlwaysRelease => write!(f, "always_release"),
            SettlementMode::SensorBounds => write!(f, "sensor_bounds"),
        }
    }
}
