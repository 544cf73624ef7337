//! # Bicycle Service
//!
//! In-memory catalog of [`Bicycle`] variants with observer events.
//!
//! Every structural change publishes an event (`bicycle.added`,
//! `bicycle.removed`, `bicycle.data_changed`). `service_all` validates each
//! bicycle independently: a failure is logged, published as
//! `bicycle.service_failed`, recorded in the [`ServiceReport`], and the loop
//! moves on to the next bicycle.

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::json;

use crate::constants::events;
use crate::error::{GarageError, Result};
use crate::events::EventPublisher;
use crate::models::{Bicycle, BicycleCapability};

/// Outcome of one `service_all` pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ServiceReport {
    /// Brands that passed validation, in catalog order
    pub serviced: Vec<String>,
    pub failures: Vec<ServiceFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceFailure {
    pub brand: String,
    pub reason: String,
}

impl ServiceReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct BicycleService {
    bikes: RwLock<Vec<Bicycle>>,
    publisher: EventPublisher,
}

impl BicycleService {
    pub fn new(publisher: EventPublisher) -> Self {
        Self {
            bikes: RwLock::new(Vec::new()),
            publisher,
        }
    }

    pub fn publisher(&self) -> &EventPublisher {
        &self.publisher
    }

    pub fn add(&self, bicycle: Bicycle) {
        let payload = json!({ "brand": bicycle.brand, "kind": bicycle.kind.label() });
        let brand = bicycle.brand.clone();
        self.bikes.write().push(bicycle);

        crate::log_service!(info, "Bicycle added", brand: brand);
        self.publish(events::BICYCLE_ADDED, payload);
    }

    /// Remove the first bicycle with `brand`; `false` if there is none
    pub fn remove(&self, brand: &str) -> bool {
        let removed = {
            let mut bikes = self.bikes.write();
            bikes
                .iter()
                .position(|b| b.brand == brand)
                .map(|index| bikes.remove(index))
        };

        match removed {
            Some(bicycle) => {
                crate::log_service!(info, "Bicycle removed", brand: bicycle.brand);
                self.publish(
                    events::BICYCLE_REMOVED,
                    json!({ "brand": bicycle.brand, "kind": bicycle.kind.label() }),
                );
                true
            }
            None => false,
        }
    }

    /// Change a bicycle's brand and announce the data change
    pub fn rename(&self, brand: &str, new_brand: impl Into<String>) -> Result<()> {
        let new_brand = new_brand.into();
        {
            let mut bikes = self.bikes.write();
            let bicycle = bikes
                .iter_mut()
                .find(|b| b.brand == brand)
                .ok_or_else(|| GarageError::not_found(format!("bicycle '{brand}'")))?;
            bicycle.brand = new_brand.clone();
        }

        let message = format!("{new_brand}: data changed");
        crate::log_service!(info, "Bicycle data changed", brand: new_brand, previous: brand);
        self.publish(
            events::BICYCLE_DATA_CHANGED,
            json!({ "brand": new_brand, "previous": brand, "message": message }),
        );
        Ok(())
    }

    /// One description per bicycle, catalog order
    pub fn describe_all(&self) -> Vec<String> {
        self.bikes.read().iter().map(BicycleCapability::describe).collect()
    }

    /// Validate every bicycle; failures never stop the pass
    pub fn service_all(&self) -> ServiceReport {
        let snapshot = self.snapshot();
        let mut report = ServiceReport::default();

        for bicycle in &snapshot {
            match bicycle.validate() {
                Ok(()) => {
                    crate::log_service!(info, "Bicycle serviced", brand: bicycle.brand);
                    self.publish(events::BICYCLE_SERVICED, json!({ "brand": bicycle.brand }));
                    report.serviced.push(bicycle.brand.clone());
                }
                Err(e) => {
                    crate::log_service!(warn, "Service failed", brand: bicycle.brand, error: e.to_string());
                    self.publish(
                        events::BICYCLE_SERVICE_FAILED,
                        json!({ "brand": bicycle.brand, "error": e.to_string() }),
                    );
                    report.failures.push(ServiceFailure {
                        brand: bicycle.brand.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        report
    }

    pub fn for_each<F>(&self, mut action: F)
    where
        F: FnMut(&Bicycle),
    {
        for bicycle in &self.snapshot() {
            action(bicycle);
        }
    }

    /// Bicycles built after `year`, produced lazily from a snapshot
    pub fn newer_than(&self, year: i32) -> impl Iterator<Item = Bicycle> {
        self.snapshot().into_iter().filter(move |b| b.year > year)
    }

    /// Bicycles matching `predicate`, typically a variant check like `Bicycle::is_road`
    pub fn of_kind<P>(&self, predicate: P) -> Vec<Bicycle>
    where
        P: Fn(&Bicycle) -> bool,
    {
        self.snapshot().into_iter().filter(|b| predicate(b)).collect()
    }

    pub fn count_where<P>(&self, predicate: P) -> usize
    where
        P: Fn(&Bicycle) -> bool,
    {
        self.bikes.read().iter().filter(|b| predicate(b)).count()
    }

    /// Oldest first; equal years keep catalog order
    pub fn sorted_by_year(&self) -> Vec<Bicycle> {
        let mut sorted = self.snapshot();
        sorted.sort_by(Bicycle::cmp_by_year);
        sorted
    }

    pub fn average_year(&self) -> Option<f64> {
        let bikes = self.bikes.read();
        if bikes.is_empty() {
            return None;
        }
        let total: i64 = bikes.iter().map(|b| i64::from(b.year)).sum();
        Some(total as f64 / bikes.len() as f64)
    }

    pub fn len(&self) -> usize {
        self.bikes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.bikes.read().is_empty()
    }

    fn snapshot(&self) -> Vec<Bicycle> {
        self.bikes.read().clone()
    }

    fn publish(&self, name: &str, context: serde_json::Value) {
        let delivered = self.publisher.publish(name, context);
        tracing::trace!(event = %name, delivered, "Event published");
    }
}
