//! Core value types shared by the adapters and the hosting machine.
//!
//! This module contains the pure part of the crate:
//! - State definitions via the `State` trait
//! - Fallible guard predicates
//! - Immutable transition history
//! - The two-branch `Outcome` produced by effect adapters
//! - The `Defect` / `Cause` error taxonomy
//!
//! Nothing in here performs I/O or runs effects.

mod defect;
mod guard;
mod history;
mod outcome;
mod state;

pub use defect::{BoxError, Cause, Defect};
pub use guard::Guard;
pub use history::{StateHistory, StateTransition, Trigger};
pub use outcome::{Outcome, OutcomeTag};
pub use state::State;
