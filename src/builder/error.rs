//! Errors raised while validating a machine definition.

use thiserror::Error;

/// Why a machine definition was rejected.
#[derive(Debug, Error, PartialEq)]
pub enum BuildError {
    #[error("Initial state not specified. Call .initial(state) before .build()")]
    MissingInitialState,

    #[error("Output not specified. Call .output(f) before .build()")]
    MissingOutput,

    #[error("No states defined. Add at least one state node")]
    NoStates,

    #[error("State '{state}' is declared more than once")]
    DuplicateState { state: String },

    #[error("Initial state '{state}' has no node")]
    UndeclaredInitial { state: String },

    #[error("Transition from '{from}' targets undeclared state '{to}'")]
    UnknownTarget { from: String, to: String },

    #[error("State '{state}' has both an always transition and an invoke")]
    ConflictingNode { state: String },

    #[error("Final state '{state}' cannot have transitions")]
    FinalWithTransitions { state: String },

    #[error("Step limit must be at least 1")]
    ZeroStepLimit,
}
