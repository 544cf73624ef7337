use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of one task group run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Runner constructed, nothing launched yet
    #[default]
    NotStarted,
    /// Seeding, mutation, or long-running jobs in flight
    Running,
    /// Every long-running job finished before cancellation
    Completed,
    /// Cancellation fired before at least one job finished
    Cancelled,
}

impl RunState {
    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not_started"),
            Self::Running => write!(f, "running"),
            Self::Completed => write!(f, "completed"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}


/// What a bicycle is doing right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RideState {
    #[default]
    Idle,
    Riding,
    Servicing,
}

impl fmt::Display for RideState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Riding => write!(f, "riding"),
            Self::Servicing => write!(f, "servicing"),
        }
    }
}
