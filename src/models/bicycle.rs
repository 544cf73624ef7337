//! Bicycle variants for the service catalog.
//!
//! Variant-specific data lives in [`BicycleKind`]; behavior common to every
//! variant is the [`BicycleCapability`] trait, implemented once for
//! [`Bicycle`] by matching on the kind.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::constants::MIN_BATTERY_WH;
use crate::error::{GarageError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BicycleKind {
    Mountain { suspension_mm: i32 },
    Road { weight_kg: f64 },
    Electric { battery_wh: i32 },
}

impl BicycleKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Mountain { .. } => "mountain",
            Self::Road { .. } => "road",
            Self::Electric { .. } => "electric",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bicycle {
    pub brand: String,
    pub year: i32,
    pub kind: BicycleKind,
}

impl Bicycle {
    pub fn mountain(brand: impl Into<String>, year: i32, suspension_mm: i32) -> Self {
        Self {
            brand: brand.into(),
            year,
            kind: BicycleKind::Mountain { suspension_mm },
        }
    }

    pub fn road(brand: impl Into<String>, year: i32, weight_kg: f64) -> Self {
        Self {
            brand: brand.into(),
            year,
            kind: BicycleKind::Road { weight_kg },
        }
    }

    pub fn electric(brand: impl Into<String>, year: i32, battery_wh: i32) -> Self {
        Self {
            brand: brand.into(),
            year,
            kind: BicycleKind::Electric { battery_wh },
        }
    }

    pub fn is_road(&self) -> bool {
        matches!(self.kind, BicycleKind::Road { .. })
    }

    /// Older bicycles first
    pub fn cmp_by_year(&self, other: &Self) -> Ordering {
        self.year.cmp(&other.year)
    }
}

/// Operations every bicycle variant supports
pub trait BicycleCapability {
    /// One-line human-readable description
    fn describe(&self) -> String;

    /// Variant-specific service check
    fn validate(&self) -> Result<()>;

    /// How this bicycle rides
    fn ride(&self) -> String;
}

impl BicycleCapability for Bicycle {
    fn describe(&self) -> String {
        match &self.kind {
            BicycleKind::Mountain { suspension_mm } => format!(
                "Mountain Bike: {}, {}, Suspension: {} mm",
                self.brand, self.year, suspension_mm
            ),
            BicycleKind::Road { weight_kg } => format!(
                "Road Bike: {}, {}, Weight: {} kg",
                self.brand, self.year, weight_kg
            ),
            BicycleKind::Electric { battery_wh } => format!(
                "E-Bike: {}, {}, Battery: {} Wh",
                self.brand, self.year, battery_wh
            ),
        }
    }

    fn validate(&self) -> Result<()> {
        match &self.kind {
            BicycleKind::Mountain { suspension_mm } if *suspension_mm <= 0 => Err(
                GarageError::validation("Suspension value must be positive"),
            ),
            BicycleKind::Road { weight_kg } if *weight_kg <= 0.0 => {
                Err(GarageError::validation("Weight must be positive"))
            }
            BicycleKind::Electric { battery_wh } if *battery_wh < MIN_BATTERY_WH => {
                Err(GarageError::validation("Battery too weak"))
            }
            _ => Ok(()),
        }
    }

    fn ride(&self) -> String {
        match &self.kind {
            BicycleKind::Mountain { .. } => format!("{} is riding off-road", self.brand),
            BicycleKind::Road { .. } => format!("{} is riding very fast", self.brand),
            BicycleKind::Electric { .. } => {
                format!("{} uses its electric motor to help the rider", self.brand)
            }
        }
    }
}
