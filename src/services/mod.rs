//! # Services
//!
//! Catalog-level operations over [`crate::models::Bicycle`] variants.

pub mod bicycle_service;

pub use bicycle_service::{BicycleService, ServiceFailure, ServiceReport};
