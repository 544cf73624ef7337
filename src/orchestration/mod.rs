//! # Orchestration
//!
//! Cooperative-cancellation task group runner.
//!
//! ## Core Components
//!
//! - **TaskGroupRunner**: seeds the garage, runs the blocking mutation
//!   workers, then the long-running jobs, and aggregates their outcomes
//! - **SimulatedJob**: async seam for long-running jobs; the shared
//!   `run_cancellable_job` policy handles wait, cancellation check and apply
//! - **CancellationTrigger**: fires the shared token after a fixed delay
//!
//! Run lifecycle events are published through [`crate::events::EventPublisher`]
//! and logged with `log_runner!`.

pub mod cancellation;
pub mod jobs;
pub mod runner;

pub use cancellation::CancellationTrigger;
pub use jobs::{
    run_cancellable_job, AverageSpeedJob, JobOutcome, JobReport, JobResult, LoadGarageJob,
    SaveReportJob, SimulatedJob,
};
pub use runner::{RunOutcome, RunReport, TaskGroupRunner};

