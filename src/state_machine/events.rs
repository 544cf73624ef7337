use serde::{Deserialize, Serialize};

/// Events that drive a run through its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunEvent {
    /// Begin seeding and launching jobs
    Start,
    /// All long-running jobs completed
    Complete,
    /// At least one long-running job observed cancellation
    Cancel,
}

impl RunEvent {
    /// Get a string representation of the event type for logging
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Complete => "complete",
            Self::Cancel => "cancel",
        }
    }
}

/// Requests made of a bicycle's ride state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideEvent {
    StartRiding,
    Stop,
    Service,
}

impl RideEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::StartRiding => "start_riding",
            Self::Stop => "stop",
            Self::Service => "service",
        }
    }
}
