//! Errors raised while running a machine.

use crate::core::Defect;
use thiserror::Error;

/// Why an actor stopped before reaching a final state.
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("State '{state}' is not declared in machine '{machine}'")]
    UnknownState { machine: String, state: String },

    #[error("No done transition matched in state '{state}'")]
    NoTransition { state: String },

    #[error("Guard failed in state '{state}': {source}")]
    Guard {
        state: String,
        #[source]
        source: Defect,
    },

    /// An entry, transition or output function returned a defect or panicked.
    #[error("Action failed in state '{state}': {source}")]
    Action {
        state: String,
        #[source]
        source: Defect,
    },

    #[error("Logic '{src}' rejected in state '{state}' with no error transition: {source}")]
    Unhandled {
        state: String,
        src: String,
        #[source]
        source: Defect,
    },

    #[error("State '{state}' is not final and has nothing to do")]
    Stuck { state: String },

    #[error("Step limit of {limit} exceeded in state '{state}'")]
    StepLimit { state: String, limit: usize },
}
