//! Error types for the garage system.
//!

use thiserror::Error;

use crate::state_machine::StateMachineError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GarageError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("State transition error: {0}")]
    StateTransition(String),
    #[error("Worker join error: {0}")]
    Join(String),
}

impl GarageError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}

impl From<StateMachineError> for GarageError {
    fn from(error: StateMachineError) -> Self {
        GarageError::StateTransition(error.to_string())
    }
}

impl From<tokio::task::JoinError> for GarageError {
    fn from(error: tokio::task::JoinError) -> Self {
        GarageError::Join(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GarageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            GarageError::validation("Weight must be positive").to_string(),
            "Validation error: Weight must be positive"
        );
        assert_eq!(
            GarageError::not_found("bicycle 'Trek'").to_string(),
            "Not found: bicycle 'Trek'"
        );
    }

    #[test]
    fn test_state_machine_error_conversion() {
        let err: GarageError = StateMachineError::InvalidTransition {
            from: "idle".to_string(),
            event: "stop".to_string(),
        }
        .into();
        assert!(matches!(err, GarageError::StateTransition(_)));
    }
}
