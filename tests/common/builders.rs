//! Shared fixtures for integration tests

#![allow(dead_code)]

use garage_core::config::{GarageConfig, SeedRecord};
use garage_core::constants::DEFAULT_SEED_FLEET;
use garage_core::models::BicycleRecord;
use garage_core::registry::Garage;

/// Garage holding the default seed fleet in order
pub fn seeded_garage() -> Garage {
    let garage = Garage::new();
    garage.seed(
        DEFAULT_SEED_FLEET
            .iter()
            .map(|(model, speed)| BicycleRecord::new(*model, *speed)),
    );
    garage
}

pub fn speeds(garage: &Garage) -> Vec<i32> {
    garage.all().iter().map(BicycleRecord::speed).collect()
}

/// Default configuration with custom job timings, in milliseconds
pub fn timed_config(load_ms: u64, average_ms: u64, cancel_after_ms: Option<u64>) -> GarageConfig {
    let mut config = GarageConfig::default();
    config.runner.load_garage_ms = load_ms;
    config.runner.average_speed_ms = average_ms;
    match cancel_after_ms {
        Some(after) => config.runner.cancel_after_ms = after,
        None => config.runner.cancel_enabled = false,
    }
    config
}

pub fn seed_record(model: &str, speed: i32) -> SeedRecord {
    SeedRecord {
        model: model.to_string(),
        speed,
    }
}
