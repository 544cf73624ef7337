//! # Task Group Runner
//!
//! Drives one run through its lifecycle:
//!
//! 1. Seed the garage sequentially from configuration.
//! 2. Mutation phase: one `spawn_blocking` worker per configured delta, each
//!    calling [`Garage::increase_speed_safe`]. All workers are joined before
//!    the next phase; there is no cancellation hook here.
//! 3. Long-running phase: every configured [`SimulatedJob`] runs concurrently
//!    under one shared [`CancellationToken`], alongside an optional
//!    [`CancellationTrigger`].
//! 4. Join: outcomes are aggregated into a single [`RunOutcome`]. A cancelled
//!    run is a normal result, not an error.
//!
//! The run state is tracked by a [`RunStateMachine`] and always ends in a
//! terminal state, including when a phase fails.

use futures::future::join_all;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::config::GarageConfig;
use crate::constants::events;
use crate::error::{GarageError, Result};
use crate::events::EventPublisher;
use crate::models::BicycleRecord;
use crate::registry::Garage;
use crate::state_machine::{RunEvent, RunState, RunStateMachine};

use super::cancellation::CancellationTrigger;
use super::jobs::{
    run_cancellable_job, AverageSpeedJob, JobOutcome, JobReport, JobResult, LoadGarageJob,
    SaveReportJob, SimulatedJob,
};

/// Aggregate result of the long-running phase
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Completed,
    /// At least one job observed cancellation
    Cancelled {
        cancelled: Vec<String>,
        completed: Vec<String>,
    },
}

impl RunOutcome {
    pub fn from_jobs(jobs: &[JobReport]) -> Self {
        let (cancelled, completed): (Vec<&JobReport>, Vec<&JobReport>) =
            jobs.iter().partition(|job| job.outcome.is_cancelled());

        if cancelled.is_empty() {
            Self::Completed
        } else {
            Self::Cancelled {
                cancelled: cancelled.iter().map(|job| job.name.clone()).collect(),
                completed: completed.iter().map(|job| job.name.clone()).collect(),
            }
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    fn terminal_event(&self) -> RunEvent {
        match self {
            Self::Completed => RunEvent::Complete,
            Self::Cancelled { .. } => RunEvent::Cancel,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: Uuid,
    pub state: RunState,
    pub outcome: RunOutcome,
    /// Per-job outcomes in launch order
    pub jobs: Vec<JobReport>,
    /// Set only when the average speed job completed
    pub average_speed: Option<f64>,
    pub records: Vec<BicycleRecord>,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn job(&self, name: &str) -> Option<&JobOutcome> {
        self.jobs
            .iter()
            .find(|job| job.name == name)
            .map(|job| &job.outcome)
    }

    pub fn speeds(&self) -> Vec<i32> {
        self.records.iter().map(BicycleRecord::speed).collect()
    }
}

/// Seeds a garage, mutates it concurrently, then runs cancellable jobs
pub struct TaskGroupRunner {
    config: GarageConfig,
    garage: Arc<Garage>,
    publisher: EventPublisher,
    shutdown: CancellationToken,
    jobs: Vec<Arc<dyn SimulatedJob>>,
}

impl std::fmt::Debug for TaskGroupRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let jobs: Vec<&str> = self.jobs.iter().map(|job| job.name()).collect();
        f.debug_struct("TaskGroupRunner")
            .field("config", &self.config)
            .field("garage", &self.garage)
            .field("jobs", &jobs)
            .finish()
    }
}

impl TaskGroupRunner {
    /// Runner with the long-running jobs described by `config.runner`
    pub fn new(config: GarageConfig) -> Self {
        let jobs = configured_jobs(&config);
        Self::with_jobs(config, jobs)
    }

    /// Runner with an explicit job list, launched in the given order.
    ///
    /// `config.runner` still supplies the seed, the mutation deltas and the
    /// cancellation trigger; its job timings are ignored.
    pub fn with_jobs(config: GarageConfig, jobs: Vec<Arc<dyn SimulatedJob>>) -> Self {
        let publisher = EventPublisher::new(config.events.channel_capacity);
        let garage = if config.registry.publish_events {
            Garage::with_publisher(publisher.clone())
        } else {
            Garage::new()
        };

        Self {
            config,
            garage: Arc::new(garage),
            publisher,
            shutdown: CancellationToken::new(),
            jobs,
        }
    }

    pub fn config(&self) -> &GarageConfig {
        &self.config
    }

    pub fn garage(&self) -> &Arc<Garage> {
        &self.garage
    }

    pub fn publisher(&self) -> &EventPublisher {
        &self.publisher
    }

    /// Token that cancels the long-running phase of any run from outside,
    /// in addition to the configured trigger
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Long-running jobs in launch order
    pub fn jobs(&self) -> &[Arc<dyn SimulatedJob>] {
        &self.jobs
    }

    /// Execute one run.
    ///
    /// Each call seeds the garage again, so records accumulate across runs.
    pub async fn run(&self) -> Result<RunReport> {
        let run_id = Uuid::new_v4();
        let started = tokio::time::Instant::now();
        let mut machine = RunStateMachine::new();

        machine.transition(RunEvent::Start)?;
        crate::log_runner!(info, "Run started", run_id: run_id.to_string());
        self.publisher.publish(
            events::RUN_STARTED,
            json!({ "run_id": run_id.to_string() }),
        );

        let jobs = match self.run_phases().await {
            Ok(jobs) => jobs,
            Err(e) => {
                let state = machine.transition(RunEvent::Cancel)?;
                crate::log_runner!(error, "Run aborted",
                    run_id: run_id.to_string(),
                    state: state,
                    error: e.to_string()
                );
                self.publisher.publish(
                    events::RUN_ABORTED,
                    json!({ "run_id": run_id.to_string(), "state": state, "error": e.to_string() }),
                );
                return Err(e);
            }
        };

        let outcome = RunOutcome::from_jobs(&jobs);
        let state = machine.transition(outcome.terminal_event())?;
        let average_speed = jobs.iter().find_map(|job| match &job.outcome {
            JobOutcome::Completed(JobResult::AverageSpeed { average }) => *average,
            _ => None,
        });
        let elapsed = started.elapsed();

        match &outcome {
            RunOutcome::Completed => {
                crate::log_runner!(info, "Run completed",
                    run_id: run_id.to_string(),
                    elapsed_ms: elapsed.as_millis()
                );
                self.publisher.publish(
                    events::RUN_COMPLETED,
                    json!({ "run_id": run_id.to_string(), "outcome": outcome }),
                );
            }
            RunOutcome::Cancelled {
                cancelled,
                completed,
            } => {
                crate::log_runner!(warn, "Run cancelled",
                    run_id: run_id.to_string(),
                    cancelled: cancelled,
                    completed: completed,
                    elapsed_ms: elapsed.as_millis()
                );
                self.publisher.publish(
                    events::RUN_CANCELLED,
                    json!({ "run_id": run_id.to_string(), "outcome": outcome }),
                );
            }
        }

        Ok(RunReport {
            run_id,
            state,
            outcome,
            jobs,
            average_speed,
            records: self.garage.all().to_vec(),
            elapsed,
        })
    }

    async fn run_phases(&self) -> Result<Vec<JobReport>> {
        let seeded = self.garage.seed(self.config.seed_records());
        crate::log_runner!(info, "Garage seeded", records: seeded);

        self.run_mutation_phase().await?;
        self.run_long_running_phase().await
    }

    async fn run_mutation_phase(&self) -> Result<()> {
        let handles: Vec<_> = self
            .config
            .runner
            .mutation_deltas
            .iter()
            .map(|&delta| {
                let garage = Arc::clone(&self.garage);
                tokio::task::spawn_blocking(move || {
                    garage.increase_speed_safe(delta);
                    delta
                })
            })
            .collect();

        for joined in join_all(handles).await {
            let delta = joined?;
            crate::log_runner!(debug, "Mutation worker finished", delta: delta);
        }

        let speeds: Vec<i32> = self.garage.all().iter().map(BicycleRecord::speed).collect();
        crate::log_runner!(info, "Mutation phase finished", speeds: speeds);
        Ok(())
    }

    async fn run_long_running_phase(&self) -> Result<Vec<JobReport>> {
        let token = self.shutdown.child_token();
        let trigger = self.config.runner.cancel_after().map(|after| {
            CancellationTrigger::spawn(after, token.clone(), self.publisher.clone())
        });

        let handles: Vec<_> = self
            .jobs
            .iter()
            .map(|job| {
                tokio::spawn(run_cancellable_job(
                    Arc::clone(job),
                    Arc::clone(&self.garage),
                    token.clone(),
                    self.publisher.clone(),
                ))
            })
            .collect();

        let joined = join_all(handles).await;
        if let Some(trigger) = trigger {
            trigger.disarm();
        }

        joined
            .into_iter()
            .map(|report| report.map_err(GarageError::from))
            .collect()
    }
}

/// The standard job set: load, average, and optionally save_report
fn configured_jobs(config: &GarageConfig) -> Vec<Arc<dyn SimulatedJob>> {
    let runner = &config.runner;
    let mut jobs: Vec<Arc<dyn SimulatedJob>> = vec![
        Arc::new(LoadGarageJob::new(
            runner.load_garage_wait(),
            runner.bulk_load.iter().map(BicycleRecord::from).collect(),
        )),
        Arc::new(AverageSpeedJob::new(runner.average_speed_wait())),
    ];
    if runner.save_report_enabled {
        jobs.push(Arc::new(SaveReportJob::new(runner.save_report_wait())));
    }
    jobs
}
