pub mod bicycle;
pub mod bicycle_record;

// Re-export core models for easy access
pub use bicycle::{Bicycle, BicycleCapability, BicycleKind};
pub use bicycle_record::BicycleRecord;
