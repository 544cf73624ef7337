use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A registry entry: an immutable model name and a mutable speed in km/h.
///
/// The model has no setter; only the owning [`Garage`](crate::registry::Garage)
/// changes `speed`, and it does so under its write lock. Callers receive
/// value copies, never references into the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BicycleRecord {
    model: String,
    speed: i32,
}

impl BicycleRecord {
    pub fn new(model: impl Into<String>, speed: i32) -> Self {
        Self {
            model: model.into(),
            speed,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Speed in km/h
    pub fn speed(&self) -> i32 {
        self.speed
    }

    /// Saturating so a large negative delta cannot panic in debug builds.
    pub(crate) fn apply_delta(&mut self, delta: i32) {
        self.speed = self.speed.saturating_add(delta);
    }

    /// Ordering by speed only; two records with equal speed compare equal.
    pub fn cmp_by_speed(&self, other: &Self) -> Ordering {
        self.speed.cmp(&other.speed)
    }
}

impl fmt::Display for BicycleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} km/h", self.model, self.speed)
    }
}
