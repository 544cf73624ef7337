//! # Registry
//!
//! The thread-safe bicycle registry and its query operators.
//!
//! ```text
//! Registry
//! ├── Garage          (RwLock-guarded, copy-on-write record sequence)
//! ├── GarageSnapshot  (immutable view handed to readers)
//! ├── Filtered        (lazy, restartable filtered view)
//! └── query           (average, projection, ordering over snapshots)
//! ```

pub mod garage;
pub mod query;

// Re-export main types for easy access
pub use garage::{FilterIter, Filtered, Garage, GarageSnapshot};
