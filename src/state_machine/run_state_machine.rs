use super::{
    errors::{StateMachineError, StateMachineResult},
    events::RunEvent,
    states::RunState,
};

/// A recorded state change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTransition {
    pub from: RunState,
    pub to: RunState,
    pub event: RunEvent,
}

/// `NotStarted -> Running -> (Completed | Cancelled)`
#[derive(Debug, Default)]
pub struct RunStateMachine {
    state: RunState,
    transitions: Vec<RunTransition>,
}

impl RunStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_state(&self) -> RunState {
        self.state
    }

    pub fn transitions(&self) -> &[RunTransition] {
        &self.transitions
    }

    /// Attempt to transition the run state
    pub fn transition(&mut self, event: RunEvent) -> StateMachineResult<RunState> {
        let target = Self::determine_target_state(self.state, event)?;

        self.transitions.push(RunTransition {
            from: self.state,
            to: target,
            event,
        });
        self.state = target;

        Ok(target)
    }

    fn determine_target_state(current: RunState, event: RunEvent) -> StateMachineResult<RunState> {
        if current.is_terminal() {
            return Err(StateMachineError::AlreadyTerminal {
                state: current.to_string(),
            });
        }

        match (current, event) {
            (RunState::NotStarted, RunEvent::Start) => Ok(RunState::Running),
            (RunState::Running, RunEvent::Complete) => Ok(RunState::Completed),
            (RunState::Running, RunEvent::Cancel) => Ok(RunState::Cancelled),
            (from, event) => Err(StateMachineError::InvalidTransition {
                from: from.to_string(),
                event: event.event_type().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_to_completed() {
        let mut machine = RunStateMachine::new();
        assert_eq!(machine.transition(RunEvent::Start), Ok(RunState::Running));
        assert_eq!(machine.transition(RunEvent::Complete), Ok(RunState::Completed));
        assert_eq!(machine.transitions().len(), 2);
    }

    #[test]
    fn test_cancel_path() {
        let mut machine = RunStateMachine::new();
        machine.transition(RunEvent::Start).unwrap();
        assert_eq!(machine.transition(RunEvent::Cancel), Ok(RunState::Cancelled));
        assert!(machine.current_state().is_terminal());
    }

    #[test]
    fn test_cannot_complete_before_start() {
        let mut machine = RunStateMachine::new();
        let err = machine.transition(RunEvent::Complete).unwrap_err();
        assert_eq!(
            err,
            StateMachineError::InvalidTransition {
                from: "not_started".to_string(),
                event: "complete".to_string(),
            }
        );
        assert_eq!(machine.current_state(), RunState::NotStarted);
    }

    #[test]
    fn test_terminal_state_is_final() {
        let mut machine = RunStateMachine::new();
        machine.transition(RunEvent::Start).unwrap();
        machine.transition(RunEvent::Cancel).unwrap();

        assert!(matches!(
            machine.transition(RunEvent::Complete),
            Err(StateMachineError::AlreadyTerminal { .. })
        ));
        assert_eq!(machine.current_state(), RunState::Cancelled);
    }
}
