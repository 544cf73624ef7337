//! # Garage
//!
//! Thread-safe, insertion-ordered registry of [`BicycleRecord`]s.
//!
//! ## Locking discipline
//!
//! The sequence lives behind a single `parking_lot::RwLock` holding an
//! `Arc<Vec<_>>`:
//!
//! - **Writers** (`add`, `increase_speed_safe`) take the write lock and
//!   mutate through `Arc::make_mut`. If a reader still holds an older
//!   snapshot the vector is copied first, so that snapshot never changes.
//! - **Readers** (`all`, `filter`, `for_each`, queries) take the read lock
//!   only to clone the `Arc`, then traverse the immutable snapshot with no
//!   lock held.
//!
//! A reader therefore observes the state before or after any single
//! mutation, never a partially applied one, and user callbacks never run
//! while the lock is held.
//!
//! Events are sent before the write lock is released, so subscribers see
//! them in mutation order and the `records` count in successive
//! `garage.record_added` events is strictly increasing.
//!
//! ```rust
//! use garage_core::models::BicycleRecord;
//! use garage_core::registry::Garage;
//!
//! let garage = Garage::new();
//! garage.add(BicycleRecord::new("Giant", 35));
//! garage.add(BicycleRecord::new("Trek", 42));
//!
//! let fast = garage.filter(|b| b.speed() > 40);
//! assert_eq!(fast.iter().count(), 1);
//!
//! garage.increase_speed_safe(10);
//! // The same view recomputes on each traversal
//! assert_eq!(fast.iter().count(), 2);
//! ```

use parking_lot::RwLock;
use serde_json::json;
use std::sync::Arc;

use crate::constants::events;
use crate::events::EventPublisher;
use crate::models::BicycleRecord;

/// In-memory registry guarded by one reader-writer lock
#[derive(Debug, Default)]
pub struct Garage {
    records: RwLock<Arc<Vec<BicycleRecord>>>,
    publisher: Option<EventPublisher>,
}

impl Garage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Garage that publishes `garage.*` events for each mutation
    pub fn with_publisher(publisher: EventPublisher) -> Self {
        Self {
            records: RwLock::new(Arc::new(Vec::new())),
            publisher: Some(publisher),
        }
    }

    /// Append a record under the write lock.
    pub fn add(&self, record: BicycleRecord) {
        let model = record.model().to_string();
        let speed = record.speed();

        let len = {
            let mut guard = self.records.write();
            let records = Arc::make_mut(&mut *guard);
            records.push(record);
            let len = records.len();
            self.publish(
                events::RECORD_ADDED,
                json!({ "model": model, "speed": speed, "records": len }),
            );
            len
        };

        crate::log_registry!(debug, "Record added",
            model: model,
            speed: speed,
            records: len
        );
    }

    /// Append records one by one in iteration order; returns how many were added.
    pub fn seed<I>(&self, records: I) -> usize
    where
        I: IntoIterator<Item = BicycleRecord>,
    {
        records.into_iter().fold(0, |count, record| {
            self.add(record);
            count + 1
        })
    }

    /// Snapshot of the current sequence in insertion order.
    ///
    /// Iterate it as often as needed; call again to observe later mutations.
    pub fn all(&self) -> GarageSnapshot {
        self.snapshot()
    }

    /// Lazy, restartable view of the records matching `predicate`.
    pub fn filter<P>(&self, predicate: P) -> Filtered<'_, P>
    where
        P: Fn(&BicycleRecord) -> bool,
    {
        Filtered {
            garage: self,
            predicate,
        }
    }

    /// Records strictly faster than `min_speed`
    pub fn faster_than(&self, min_speed: i32) -> Filtered<'_, impl Fn(&BicycleRecord) -> bool> {
        self.filter(move |record| record.speed() > min_speed)
    }

    /// Invoke `action` once per record in insertion order.
    ///
    /// Runs over a snapshot, so `action` may call back into the garage.
    pub fn for_each<F>(&self, mut action: F)
    where
        F: FnMut(&BicycleRecord),
    {
        let snapshot = self.snapshot();
        for record in snapshot.iter() {
            action(record);
        }
    }

    /// Add `delta` to every record's speed while holding the write lock.
    ///
    /// Mutually exclusive with every other `add` and `increase_speed_safe`.
    /// Negative deltas are accepted.
    pub fn increase_speed_safe(&self, delta: i32) {
        let len = {
            let mut guard = self.records.write();
            let records = Arc::make_mut(&mut *guard);
            for record in records.iter_mut() {
                record.apply_delta(delta);
            }
            let len = records.len();
            self.publish(
                events::SPEED_INCREASED,
                json!({ "delta": delta, "records": len }),
            );
            len
        };

        crate::log_registry!(debug, "Speed increased", delta: delta, records: len);
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    fn snapshot(&self) -> GarageSnapshot {
        GarageSnapshot {
            records: self.records.read().clone(),
        }
    }

    /// Called with the write lock held; `broadcast::Sender::send` never blocks.
    fn publish(&self, name: &str, context: serde_json::Value) {
        if let Some(publisher) = &self.publisher {
            publisher.publish(name, context);
        }
    }
}

/// Immutable copy of the registry at one instant
#[derive(Debug, Clone)]
pub struct GarageSnapshot {
    records: Arc<Vec<BicycleRecord>>,
}

impl GarageSnapshot {
    pub fn iter(&self) -> std::slice::Iter<'_, BicycleRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[BicycleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_vec(&self) -> Vec<BicycleRecord> {
        self.records.as_ref().clone()
    }
}

impl<'a> IntoIterator for &'a GarageSnapshot {
    type Item = &'a BicycleRecord;
    type IntoIter = std::slice::Iter<'a, BicycleRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy filtered view over a [`Garage`].
///
/// Nothing is computed until [`Filtered::iter`] is called; every call takes
/// a fresh snapshot, so the view is restartable and reflects mutations made
/// between traversals.
pub struct Filtered<'g, P> {
    garage: &'g Garage,
    predicate: P,
}

impl<'g, P> Filtered<'g, P>
where
    P: Fn(&BicycleRecord) -> bool,
{
    pub fn iter(&self) -> FilterIter<'_, P> {
        FilterIter {
            snapshot: self.garage.snapshot(),
            index: 0,
            predicate: &self.predicate,
        }
    }

    pub fn to_vec(&self) -> Vec<BicycleRecord> {
        self.iter().collect()
    }
}

impl<'a, 'g, P> IntoIterator for &'a Filtered<'g, P>
where
    P: Fn(&BicycleRecord) -> bool,
{
    type Item = BicycleRecord;
    type IntoIter = FilterIter<'a, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Produces matching records on demand from one snapshot
pub struct FilterIter<'a, P> {
    snapshot: GarageSnapshot,
    index: usize,
    predicate: &'a P,
}

impl<P> Iterator for FilterIter<'_, P>
where
    P: Fn(&BicycleRecord) -> bool,
{
    type Item = BicycleRecord;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(record) = self.snapshot.records.get(self.index) {
            self.index += 1;
            if (self.predicate)(record) {
                return Some(record.clone());
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.snapshot.len().saturating_sub(self.index)))
    }
}
