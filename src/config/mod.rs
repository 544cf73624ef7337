//! # Garage Configuration System
//!
//! Typed configuration for the registry, the task group runner, the ride
//! state machine and the event publisher.
//!
//! ## Architecture
//!
//! - **Layered sources**: `garage.toml`, then `environments/{env}.toml`, then
//!   `GARAGE__*` environment variables (see [`loader::ConfigManager`])
//! - **Defaults everywhere**: every section falls back to the values in
//!   [`crate::constants`], so an empty directory yields a working config
//! - **Explicit validation**: [`GarageConfig::validate`] runs after loading
//!
//! ## Usage
//!
//! ```rust,no_run
//! use garage_core::config::ConfigManager;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let cancel_after = manager.config().runner.cancel_after();
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{self, timing};
use crate::models::BicycleRecord;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration structure mirroring garage.toml
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GarageConfig {
    /// Records appended to the garage before any concurrent work starts
    pub seed: Vec<SeedRecord>,

    /// Registry behavior
    pub registry: RegistryConfig,

    /// Task group runner timings and mutation deltas
    pub runner: RunnerConfig,

    /// Ride state machine delays
    pub ride: RideConfig,

    /// Event publisher settings
    pub events: EventsConfig,
}

/// A `(model, speed)` pair as written in configuration files
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SeedRecord {
    pub model: String,
    pub speed: i32,
}

impl From<&SeedRecord> for BicycleRecord {
    fn from(seed: &SeedRecord) -> Self {
        BicycleRecord::new(seed.model.clone(), seed.speed)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Publish `garage.*` events on add and bulk mutation
    pub publish_events: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// One blocking mutation worker is spawned per delta
    pub mutation_deltas: Vec<i32>,
    pub cancel_enabled: bool,
    pub cancel_after_ms: u64,
    pub load_garage_ms: u64,
    pub average_speed_ms: u64,
    pub save_report_enabled: bool,
    pub save_report_ms: u64,
    /// Records appended by the load job when it completes
    pub bulk_load: Vec<SeedRecord>,
}

impl RunnerConfig {
    /// Delay before the cancellation trigger fires, if enabled
    pub fn cancel_after(&self) -> Option<Duration> {
        self.cancel_enabled
            .then(|| Duration::from_millis(self.cancel_after_ms))
    }

    pub fn load_garage_wait(&self) -> Duration {
        Duration::from_millis(self.load_garage_ms)
    }

    pub fn average_speed_wait(&self) -> Duration {
        Duration::from_millis(self.average_speed_ms)
    }

    pub fn save_report_wait(&self) -> Duration {
        Duration::from_millis(self.save_report_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RideConfig {
    pub start_ms: u64,
    pub stop_ms: u64,
    pub service_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EventsConfig {
    pub channel_capacity: usize,
}

impl Default for GarageConfig {
    fn default() -> Self {
        Self {
            seed: constants::DEFAULT_SEED_FLEET
                .iter()
                .map(|(model, speed)| SeedRecord {
                    model: (*model).to_string(),
                    speed: *speed,
                })
                .collect(),
            registry: RegistryConfig::default(),
            runner: RunnerConfig::default(),
            ride: RideConfig::default(),
            events: EventsConfig::default(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            publish_events: true,
        }
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            mutation_deltas: constants::DEFAULT_MUTATION_DELTAS.to_vec(),
            cancel_enabled: true,
            cancel_after_ms: timing::CANCEL_AFTER_MS,
            load_garage_ms: timing::LOAD_GARAGE_MS,
            average_speed_ms: timing::AVERAGE_SPEED_MS,
            save_report_enabled: false,
            save_report_ms: timing::SAVE_REPORT_MS,
            bulk_load: Vec::new(),
        }
    }
}

impl Default for RideConfig {
    fn default() -> Self {
        Self {
            start_ms: timing::RIDE_START_MS,
            stop_ms: timing::RIDE_STOP_MS,
            service_ms: timing::SERVICE_MS,
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            channel_capacity: constants::DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }
}

impl GarageConfig {
    /// Validate the loaded configuration
    pub fn validate(&self) -> ConfigResult<()> {
        validate_records("seed", &self.seed)?;
        validate_records("runner.bulk_load", &self.runner.bulk_load)?;

        if self.runner.mutation_deltas.is_empty() {
            return Err(ConfigurationError::invalid_value(
                "runner.mutation_deltas",
                "[]",
                "at least one mutation worker is required",
            ));
        }

        let waits = [
            ("runner.load_garage_ms", self.runner.load_garage_ms),
            ("runner.average_speed_ms", self.runner.average_speed_ms),
            ("runner.save_report_ms", self.runner.save_report_ms),
        ];
        for (field, value) in waits {
            if value == 0 {
                return Err(ConfigurationError::invalid_value(
                    field,
                    value.to_string(),
                    "wait duration must be greater than zero",
                ));
            }
        }

        if self.events.channel_capacity == 0 {
            return Err(ConfigurationError::invalid_value(
                "events.channel_capacity",
                "0",
                "broadcast capacity must be greater than zero",
            ));
        }

        Ok(())
    }

    /// Seed records in configuration order
    pub fn seed_records(&self) -> Vec<BicycleRecord> {
        self.seed.iter().map(BicycleRecord::from).collect()
    }
}

fn validate_records(field: &str, records: &[SeedRecord]) -> ConfigResult<()> {
    for (index, record) in records.iter().enumerate() {
        if record.model.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                format!("{field}[{index}].model"),
                record.model.clone(),
                "model name must not be empty",
            ));
        }
    }
    Ok(())
}
