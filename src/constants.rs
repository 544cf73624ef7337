//! # System Constants
//!
//! Default fleet, timing defaults, and event names shared across the garage,
//! the bicycle service, and the task group runner.

/// Seed fleet loaded into a fresh garage: `(model, speed km/h)`.
pub const DEFAULT_SEED_FLEET: [(&str, i32); 4] =
    [("Giant", 35), ("Trek", 42), ("Cube", 28), ("Scott", 40)];

/// Speed deltas applied by the concurrent mutation workers.
pub const DEFAULT_MUTATION_DELTAS: [i32; 2] = [5, 10];

/// Long-running job and cancellation timings, in milliseconds
pub mod timing {
    pub const LOAD_GARAGE_MS: u64 = 3000;
    pub const AVERAGE_SPEED_MS: u64 = 1500;
    pub const SAVE_REPORT_MS: u64 = 2500;
    pub const CANCEL_AFTER_MS: u64 = 2000;

    pub const RIDE_START_MS: u64 = 1000;
    pub const RIDE_STOP_MS: u64 = 500;
    pub const SERVICE_MS: u64 = 1500;
}

/// Long-running job names as they appear in logs and run reports
pub mod jobs {
    pub const LOAD_GARAGE: &str = "load_garage";
    pub const AVERAGE_SPEED: &str = "average_speed";
    pub const SAVE_REPORT: &str = "save_report";
}

/// Battery capacity an electric bike needs to pass service.
pub const MIN_BATTERY_WH: i32 = 100;

/// Default broadcast capacity for the event publisher.
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Lifecycle events published by the garage, service, and runner
pub mod events {
    // Registry events
    pub const RECORD_ADDED: &str = "garage.record_added";
    pub const SPEED_INCREASED: &str = "garage.speed_increased";

    // Bicycle service events
    pub const BICYCLE_ADDED: &str = "bicycle.added";
    pub const BICYCLE_REMOVED: &str = "bicycle.removed";
    pub const BICYCLE_SERVICED: &str = "bicycle.serviced";
    pub const BICYCLE_SERVICE_FAILED: &str = "bicycle.service_failed";
    pub const BICYCLE_DATA_CHANGED: &str = "bicycle.data_changed";

    // Runner events
    pub const RUN_STARTED: &str = "run.started";
    pub const JOB_STARTED: &str = "run.job_started";
    pub const JOB_COMPLETED: &str = "run.job_completed";
    pub const JOB_CANCELLED: &str = "run.job_cancelled";
    pub const CANCELLATION_REQUESTED: &str = "run.cancellation_requested";
    pub const RUN_COMPLETED: &str = "run.completed";
    pub const RUN_CANCELLED: &str = "run.cancelled";
    pub const RUN_ABORTED: &str = "run.aborted";
}
