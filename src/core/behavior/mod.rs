//! Reusable state-machine-driven behavior.

mod state_machine;

pub use state_machine::{FnState, StateHandler, StateId, StateMachine};
