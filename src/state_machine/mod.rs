// State machine module for run and ride lifecycles
//
// Run lifecycle: NotStarted -> Running -> (Completed | Cancelled)
// Ride lifecycle: Idle <-> Riding, any non-servicing state -> Servicing -> Idle

pub mod errors;
pub mod events;
pub mod ride_state_machine;
pub mod run_state_machine;
pub mod states;

// Re-export main types for convenient access
pub use errors::{StateMachineError, StateMachineResult};
pub use events::{RideEvent, RunEvent};
pub use ride_state_machine::RideStateMachine;
pub use run_state_machine::{RunStateMachine, RunTransition};
pub use states::{RideState, RunState};
