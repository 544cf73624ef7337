use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateMachineError {
    #[error("Invalid transition from '{from}' on event '{event}'")]
    InvalidTransition { from: String, event: String },

    #[error("Run already reached terminal state '{state}'")]
    AlreadyTerminal { state: String },
}

pub type StateMachineResult<T> = std::result::Result<T, StateMachineError>;
