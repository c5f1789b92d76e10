//! Error taxonomy for effect adapters.
//!
//! A computation can end in three ways: success, a declared failure, or a
//! defect. Declared failures travel inside an [`Outcome`](super::Outcome);
//! defects reject the asynchronous operation and are never folded into it.

use thiserror::Error;

/// Boxed error carried by rejected plain functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A fault outside a computation's declared failure channel.
#[derive(Debug, Error)]
pub enum Defect {
    #[error("Service not found: {capability}")]
    MissingCapability { capability: String },

    #[error("Layer failed to build '{capability}': {reason}")]
    LayerBuild { capability: String, reason: String },

    #[error("Computation panicked: {0}")]
    Panicked(String),

    #[error("Computation died: {0}")]
    Died(String),

    #[error("Computation rejected: {0}")]
    Rejected(#[source] BoxError),

    #[error("No computation declared under '{key}'")]
    UnknownLogic { key: String },

    #[error("Event payload is not a {expected}")]
    PayloadMismatch { expected: &'static str },

    #[error("Expected a {expected} outcome, found {found}")]
    OutcomeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

impl Defect {
    /// Build a defect from a panic payload, keeping its message when it has one.
    pub(crate) fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(message) => (*message).to_string(),
                Err(_) => "non-string panic payload".to_string(),
            },
        };
        Defect::Panicked(message)
    }
}

/// Error channel of every effect run by the adapters.
///
/// `Fail` is the declared, typed failure. `Die` marks a defect raised from
/// inside the effect, for example a capability missing from the context.
#[derive(Debug)]
pub enum Cause<E> {
    Fail(E),
    Die(Defect),
}

impl<E> Cause<E> {
    pub fn is_die(&self) -> bool {
        matches!(self, Cause::Die(_))
    }

    /// Split the cause into the declared failure or the defect.
    pub fn into_result(self) -> Result<E, Defect> {
        match self {
            Cause::Fail(error) => Ok(error),
            Cause::Die(defect) => Err(defect),
        }
    }
}

impl<E> From<Defect> for Cause<E> {
    fn from(defect: Defect) -> Self {
        Cause::Die(defect)
    }
}
