//! Two-branch outcome of an effect run.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of running an effect to completion: its success value or its
/// declared failure. Exactly one branch is populated.
///
/// # Example
///
/// ```rust
/// use effect_logic::core::{Outcome, OutcomeTag};
///
/// let ok: Outcome<u32, String> = Outcome::Success(7);
/// assert!(ok.is_success());
/// assert_eq!(ok.tag(), OutcomeTag::Success);
///
/// let failed: Outcome<u32, String> = Err("empty".to_string()).into();
/// assert_eq!(failed.failure(), Some("empty".to_string()));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tag", content = "value", rename_all = "snake_case")]
pub enum Outcome<T, E> {
    Success(T),
    Failure(E),
}

/// Which branch of an [`Outcome`] is populated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeTag {
    Success,
    Failure,
}

impl OutcomeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeTag::Success => "success",
            OutcomeTag::Failure => "failure",
        }
    }
}

impl fmt::Display for OutcomeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<T, E> Outcome<T, E> {
    pub fn tag(&self) -> OutcomeTag {
        match self {
            Outcome::Success(_) => OutcomeTag::Success,
            Outcome::Failure(_) => OutcomeTag::Failure,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure(_) => None,
        }
    }

    pub fn failure(self) -> Option<E> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(error) => Some(error),
        }
    }

    pub fn as_ref(&self) -> Outcome<&T, &E> {
        match self {
            Outcome::Success(value) => Outcome::Success(value),
            Outcome::Failure(error) => Outcome::Failure(error),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U, E> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Failure(error) => Outcome::Failure(error),
        }
    }

    pub fn map_failure<G, F: FnOnce(E) -> G>(self, f: F) -> Outcome<T, G> {
        match self {
            Outcome::Success(value) => Outcome::Success(value),
            Outcome::Failure(error) => Outcome::Failure(f(error)),
        }
    }

    pub fn into_result(self) -> Result<T, E> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(error) => Err(error),
        }
    }
}

impl<T, E> From<Result<T, E>> for Outcome<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(error) => Outcome::Failure(error),
        }
    }
}
