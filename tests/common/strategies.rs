#![allow(dead_code)]

use garage_core::models::BicycleRecord;
use proptest::prelude::*;

/// Strategy for generating model names
pub fn model_name_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,9}"
}

/// Strategy for speeds far enough from `i32` bounds that summing deltas never saturates
pub fn speed_strategy() -> impl Strategy<Value = i32> {
    -1_000i32..1_000
}

pub fn delta_strategy() -> impl Strategy<Value = i32> {
    -100i32..100
}

pub fn record_strategy() -> impl Strategy<Value = BicycleRecord> {
    (model_name_strategy(), speed_strategy())
        .prop_map(|(model, speed)| BicycleRecord::new(model, speed))
}

pub fn fleet_strategy() -> impl Strategy<Value = Vec<BicycleRecord>> {
    prop::collection::vec(record_strategy(), 0..32)
}
