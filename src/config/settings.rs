use crate::core::settlement::{Bounds, SettlementMode};
use crate::error::{LedgerError, Result};
use log::{info, warn};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

/// Defaults with the process environment applied
pub static GLOBAL_CONFIG: Lazy<Settings> = Lazy::new(|| {
    let mut settings = Settings::default();
    settings.apply_overrides(|key| env::var(key).ok());
    settings
});

static DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";

const LISTEN_ADDR_KEY: &str = "BHARAT_LISTEN_ADDR";
const INITIAL_BALANCE_KEY: &str = "BHARAT_INITIAL_BALANCE";
const RELEASE_FEE_KEY: &str = "BHARAT_RELEASE_FEE";
const SETTLEMENT_MODE_KEY: &str = "BHARAT_SETTLEMENT_MODE";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub listen_addr: String,
    /// Wallet funding at ledger construction
    pub initial_balance: f64,
    /// Deducted on every RELEASED commit, on top of the gas value
    pub release_fee: f64,
    pub request_timeout_secs: u64,
    pub settlement: SettlementSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SettlementSettings {
    pub mode: SettlementMode,
    pub moisture: Bounds,
    pub ultrasonic: Bounds,
    pub temperature: Bounds,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            listen_addr: String::from(DEFAULT_LISTEN_ADDR),
            initial_balance: 1_000_000.0,
            release_fee: 5000.0,
            request_timeout_secs: 10,
            settlement: SettlementSettings::default(),
        }
    }
}

impl Default for SettlementSettings {
    fn default() -> Self {
        SettlementSettings {
            mode: SettlementMode::AlwaysRelease,
            moisture: Bounds::new(0.0, 20.0),
            ultrasonic: Bounds::new(0.75, 1.0),
            temperature: Bounds::new(5.0, 45.0),
        }
    }
}

impl Settings {
    /// Load settings from `path`, or start from defaults when no file is given.
    /// Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Settings> {
        let mut settings = match path {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|e| {
                    LedgerError::Config(format!("Failed to read {}: {e}", path.display()))
                })?;
                info!("Loaded configuration from {}", path.display());
                Self::from_toml(&raw)?
            }
            None => Settings::default(),
        };
        settings.apply_overrides(|key| env::var(key).ok());
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_toml(raw: &str) -> Result<Settings> {
        let settings: Settings = toml::from_str(raw)?;
        Ok(settings)
    }

    /// Apply overrides from a key lookup. Unparsable values are logged and skipped.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup(LISTEN_ADDR_KEY) {
            self.listen_addr = addr;
        }
        if let Some(raw) = lookup(INITIAL_BALANCE_KEY) {
            match raw.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => self.initial_balance = v,
                _ => warn!("Ignoring {INITIAL_BALANCE_KEY}={raw}: not a number"),
            }
        }
        if let Some(raw) = lookup(RELEASE_FEE_KEY) {
            match raw.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => self.release_fee = v,
                _ => warn!("Ignoring {RELEASE_FEE_KEY}={raw}: not a number"),
            }
        }
        if let Some(raw) = lookup(SETTLEMENT_MODE_KEY) {
            match raw.parse::<SettlementMode>() {
                Ok(mode) => self.settlement.mode = mode,
                Err(e) => warn!("Ignoring {SETTLEMENT_MODE_KEY}: {e}"),
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.initial_balance.is_finite() {
            return Err(LedgerError::Config(
                "initial_balance must be a finite number".to_string(),
            ));
        }
        if !self.release_fee.is_finite() || self.release_fee < 0.0 {
            return Err(LedgerError::Config(format!(
                "release_fee must be a non-negative number, got {}",
                self.release_fee
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(LedgerError::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        let bounds = [
            ("moisture", &self.settlement.moisture),
            ("ultrasonic", &self.settlement.ultrasonic),
            ("temperature", &self.settlement.temperature),
        ];
        for (name, b) in bounds {
            if b.min > b.max {
                return Err(LedgerError::Config(format!(
                    "settlement.{name}: min {} exceeds max {}",
                    b.min, b.max
                )));
            }
        }
        Ok(())
    }
}
