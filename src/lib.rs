#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Garage Core
//!
//! Thread-safe bicycle registry with a cooperative-cancellation task group
//! runner.
//!
//! ## Overview
//!
//! The core keeps an insertion-ordered registry of bicycle records that many
//! workers may mutate concurrently, offers lazy filtered views and snapshot
//! queries over it, and runs a group of simulated long-running jobs that all
//! honor one shared cancellation signal.
//!
//! ## Key Features
//!
//! - **Consistent reads**: every read works on a copy-on-write snapshot, so it
//!   never observes a half-applied bulk mutation
//! - **Lazy views**: [`registry::Filtered`] recomputes on each traversal
//! - **Cooperative cancellation**: jobs wait once, observe the token, and
//!   never apply a result after cancellation
//! - **Bicycle variants**: mountain, road and electric bikes behind one
//!   capability trait, with a catalog service that publishes change events
//!
//! ## Module Organization
//!
//! - [`registry`] - The `Garage` registry, snapshots, lazy views and queries
//! - [`orchestration`] - Task group runner, long-running jobs, cancellation
//! - [`services`] - Bicycle catalog service
//! - [`models`] - Bicycle records and variants
//! - [`state_machine`] - Run and ride lifecycles
//! - [`config`] - Layered configuration management
//! - [`events`] - Broadcast event publishing
//! - [`error`] - Structured error handling
//! - [`logging`] - Console tracing setup and logging macros
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use garage_core::config::GarageConfig;
//! use garage_core::orchestration::TaskGroupRunner;
//!
//! # async fn example() -> garage_core::Result<()> {
//! let runner = TaskGroupRunner::new(GarageConfig::default());
//! let report = runner.run().await?;
//!
//! for record in &report.records {
//!     println!("{record}");
//! }
//! println!("Run finished as {}", report.state);
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # Unit, integration and property tests
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod registry;
pub mod services;
pub mod state_machine;

pub use config::{ConfigManager, ConfigurationError, GarageConfig};
pub use error::{GarageError, Result};
pub use events::{EventPublisher, PublishedEvent};
pub use models::{Bicycle, BicycleCapability, BicycleKind, BicycleRecord};
pub use orchestration::{JobOutcome, JobResult, RunOutcome, RunReport, TaskGroupRunner};
pub use registry::{Filtered, Garage, GarageSnapshot};
pub use services::{BicycleService, ServiceReport};
pub use state_machine::{RideState, RideStateMachine, RunState};
