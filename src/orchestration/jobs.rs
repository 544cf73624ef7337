//! # Long-Running Jobs
//!
//! Simulated jobs that wait a fixed duration and then apply a result to the
//! garage. Cancellation is owned by [`run_cancellable_job`]: each job waits
//! exactly once, the wait is interruptible, and the token is re-checked
//! before anything is applied. A cancelled job never touches the garage.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::constants::{events, jobs};
use crate::events::EventPublisher;
use crate::models::BicycleRecord;
use crate::registry::{Garage, GarageSnapshot};

/// A long-running job with one timed wait followed by a result
#[async_trait]
pub trait SimulatedJob: Send + Sync {
    fn name(&self) -> &'static str;

    /// Simulated work duration
    fn wait(&self) -> Duration;

    /// Apply the job's result; only called when the wait was not cancelled
    async fn apply(&self, garage: &Garage) -> JobResult;
}

/// What a completed job contributed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobResult {
    Loaded { count: usize },
    AverageSpeed { average: Option<f64> },
    ReportSaved { lines: usize },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum JobOutcome {
    Completed(JobResult),
    Cancelled,
}

impl JobOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Outcome of one job, tagged with the job's name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobReport {
    pub name: String,
    pub outcome: JobOutcome,
}

/// Wait for `job.wait()` unless `token` fires first, then apply the result.
///
/// The token is checked again after the wait, so a cancellation that lands
/// in the same tick as the timer still wins.
pub async fn run_cancellable_job(
    job: Arc<dyn SimulatedJob>,
    garage: Arc<Garage>,
    token: CancellationToken,
    publisher: EventPublisher,
) -> JobReport {
    let name = job.name();
    let wait = job.wait();

    crate::log_runner!(info, "Job started", job: name, wait_ms: wait.as_millis());
    publisher.publish(
        events::JOB_STARTED,
        json!({ "job": name, "wait_ms": wait.as_millis() as u64 }),
    );

    let interrupted = tokio::select! {
        biased;
        _ = token.cancelled() => true,
        _ = tokio::time::sleep(wait) => false,
    };

    if interrupted || token.is_cancelled() {
        crate::log_runner!(warn, "Job cancelled", job: name);
        publisher.publish(events::JOB_CANCELLED, json!({ "job": name }));
        return JobReport {
            name: name.to_string(),
            outcome: JobOutcome::Cancelled,
        };
    }

    let result = job.apply(&garage).await;
    crate::log_runner!(info, "Job completed", job: name, result: result);
    publisher.publish(
        events::JOB_COMPLETED,
        json!({ "job": name, "result": result }),
    );

    JobReport {
        name: name.to_string(),
        outcome: JobOutcome::Completed(result),
    }
}

/// Appends a bulk-load batch once its wait elapses
#[derive(Debug, Clone)]
pub struct LoadGarageJob {
    wait: Duration,
    batch: Vec<BicycleRecord>,
}

impl LoadGarageJob {
    pub fn new(wait: Duration, batch: Vec<BicycleRecord>) -> Self {
        Self { wait, batch }
    }
}

#[async_trait]
impl SimulatedJob for LoadGarageJob {
    fn name(&self) -> &'static str {
        jobs::LOAD_GARAGE
    }

    fn wait(&self) -> Duration {
        self.wait
    }

    async fn apply(&self, garage: &Garage) -> JobResult {
        let count = garage.seed(self.batch.iter().cloned());
        JobResult::Loaded { count }
    }
}

#[derive(Debug, Clone)]
pub struct AverageSpeedJob {
    wait: Duration,
}

impl AverageSpeedJob {
    pub fn new(wait: Duration) -> Self {
        Self { wait }
    }
}

#[async_trait]
impl SimulatedJob for AverageSpeedJob {
    fn name(&self) -> &'static str {
        jobs::AVERAGE_SPEED
    }

    fn wait(&self) -> Duration {
        self.wait
    }

    async fn apply(&self, garage: &Garage) -> JobResult {
        JobResult::AverageSpeed {
            average: garage.average_speed(),
        }
    }
}

/// Renders a one-line-per-record report; nothing is written to disk
#[derive(Debug, Clone)]
pub struct SaveReportJob {
    wait: Duration,
}

impl SaveReportJob {
    pub fn new(wait: Duration) -> Self {
        Self { wait }
    }
}

#[async_trait]
impl SimulatedJob for SaveReportJob {
    fn name(&self) -> &'static str {
        jobs::SAVE_REPORT
    }

    fn wait(&self) -> Duration {
        self.wait
    }

    async fn apply(&self, garage: &Garage) -> JobResult {
        let lines = render_report(&garage.all());
        for line in &lines {
            tracing::debug!(line = %line, "Report line");
        }
        JobResult::ReportSaved { lines: lines.len() }
    }
}

pub fn render_report(snapshot: &GarageSnapshot) -> Vec<String> {
    snapshot.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn garage() -> Arc<Garage> {
        let garage = Garage::new();
        garage.add(BicycleRecord::new("Giant", 40));
        garage.add(BicycleRecord::new("Trek", 50));
        Arc::new(garage)
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_elapses_first_applies_result() {
        let garage = garage();
        let job = Arc::new(LoadGarageJob::new(
            Duration::from_millis(100),
            vec![BicycleRecord::new("Cube", 28)],
        ));

        let report = run_cancellable_job(
            job,
            Arc::clone(&garage),
            CancellationToken::new(),
            EventPublisher::default(),
        )
        .await;

        assert_eq!(report.name, "load_garage");
        assert_eq!(
            report.outcome,
            JobOutcome::Completed(JobResult::Loaded { count: 1 })
        );
        assert_eq!(garage.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_before_wait_never_applies() {
        let garage = garage();
        let token = CancellationToken::new();
        let job = Arc::new(LoadGarageJob::new(
            Duration::from_millis(3000),
            vec![BicycleRecord::new("Cube", 28)],
        ));

        let handle = tokio::spawn(run_cancellable_job(
            job,
            Arc::clone(&garage),
            token.clone(),
            EventPublisher::default(),
        ));
        tokio::time::sleep(Duration::from_millis(2000)).await;
        token.cancel();

        let report = handle.await.unwrap();
        assert!(report.outcome.is_cancelled());
        assert_eq!(garage.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_already_cancelled_token_short_circuits() {
        let token = CancellationToken::new();
        token.cancel();

        let started = tokio::time::Instant::now();
        let report = run_cancellable_job(
            Arc::new(AverageSpeedJob::new(Duration::from_secs(60))),
            garage(),
            token,
            EventPublisher::default(),
        )
        .await;

        assert!(report.outcome.is_cancelled());
        assert!(started.elapsed() < Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_average_and_report_results() {
        let garage = garage();
        let publisher = EventPublisher::default();
        let mut receiver = publisher.subscribe();

        let average = run_cancellable_job(
            Arc::new(AverageSpeedJob::new(Duration::from_millis(10))),
            Arc::clone(&garage),
            CancellationToken::new(),
            publisher.clone(),
        )
        .await;
        assert_eq!(
            average.outcome,
            JobOutcome::Completed(JobResult::AverageSpeed { average: Some(45.0) })
        );

        let report = run_cancellable_job(
            Arc::new(SaveReportJob::new(Duration::from_millis(10))),
            garage,
            CancellationToken::new(),
            publisher,
        )
        .await;
        assert_eq!(
            report.outcome,
            JobOutcome::Completed(JobResult::ReportSaved { lines: 2 })
        );

        let names: Vec<String> = std::iter::from_fn(|| receiver.try_recv().ok())
            .map(|event| event.name)
            .collect();
        assert_eq!(
            names,
            vec![
                events::JOB_STARTED,
                events::JOB_COMPLETED,
                events::JOB_STARTED,
                events::JOB_COMPLETED,
            ]
        );
    }

    #[test]
    fn test_render_report_one_line_per_record() {
        let lines = render_report(&garage().all());
        assert_eq!(lines, vec!["Giant - 40 km/h", "Trek - 50 km/h"]);
    }
}
