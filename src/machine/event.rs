//! Done events and the guards that read them.

use crate::core::{Defect, Guard, Outcome, OutcomeTag};
use std::any::{type_name, Any};
use std::fmt;

/// Event produced when invoked logic resolves.
///
/// The payload is type-erased: the state that invoked the logic knows its
/// output type, the event does not. Every accessor checks the payload type
/// at runtime and reports a [`Defect`] instead of guessing.
pub struct DoneEvent {
    src: String,
    output: Box<dyn Any + Send>,
}

impl DoneEvent {
    pub(crate) fn new(src: impl Into<String>, output: Box<dyn Any + Send>) -> Self {
        Self {
            src: src.into(),
            output,
        }
    }

    /// Name of the invoked logic.
    pub fn src(&self) -> &str {
        &self.src
    }

    /// The raw output, if it is an `O`.
    pub fn output<O: Any>(&self) -> Result<&O, Defect> {
        self.output
            .downcast_ref::<O>()
            .ok_or(Defect::PayloadMismatch {
                expected: type_name::<O>(),
            })
    }

    /// The output of effect-backed logic.
    pub fn outcome<T: Any, E: Any>(&self) -> Result<&Outcome<T, E>, Defect> {
        self.output::<Outcome<T, E>>()
    }

    /// The success value, checking that the outcome is a success.
    pub fn success<T: Any, E: Any>(&self) -> Result<&T, Defect> {
        match self.outcome::<T, E>()? {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(_) => Err(tag_mismatch(OutcomeTag::Success, OutcomeTag::Failure)),
        }
    }

    /// The declared failure, checking that the outcome is a failure.
    pub fn failure<T: Any, E: Any>(&self) -> Result<&E, Defect> {
        match self.outcome::<T, E>()? {
            Outcome::Failure(error) => Ok(error),
            Outcome::Success(_) => Err(tag_mismatch(OutcomeTag::Failure, OutcomeTag::Success)),
        }
    }
}

fn tag_mismatch(expected: OutcomeTag, found: OutcomeTag) -> Defect {
    Defect::OutcomeMismatch {
        expected: expected.as_str(),
        found: found.as_str(),
    }
}

impl fmt::Debug for DoneEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoneEvent")
            .field("src", &self.src)
            .finish_non_exhaustive()
    }
}

/// Guard passing when the invoked effect resolved with a declared failure.
///
/// Fails with a defect when the event does not carry an `Outcome<T, E>`.
pub fn is_output_failure<T: Any, E: Any>() -> Guard<DoneEvent> {
    Guard::try_new(|event: &DoneEvent| Ok(event.outcome::<T, E>()?.is_failure()))
}

/// Guard passing when the invoked effect resolved with a success.
pub fn is_output_success<T: Any, E: Any>() -> Guard<DoneEvent> {
    Guard::try_new(|event: &DoneEvent| Ok(event.outcome::<T, E>()?.is_success()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(output: impl Any + Send) -> DoneEvent {
        DoneEvent::new("demo", Box::new(output))
    }

    #[test]
    fn output_downcasts_to_the_right_type() {
        let done = event(7u32);

        assert_eq!(done.src(), "demo");
        assert_eq!(*done.output::<u32>().unwrap(), 7);
        assert!(matches!(
            done.output::<String>(),
            Err(Defect::PayloadMismatch { expected }) if expected.contains("String")
        ));
    }

    #[test]
    fn success_and_failure_check_the_tag() {
        let ok = event(Outcome::<u8, String>::Success(1));
        let failed = event(Outcome::<u8, String>::Failure("bad".into()));

        assert_eq!(*ok.success::<u8, String>().unwrap(), 1);
        assert_eq!(failed.failure::<u8, String>().unwrap(), "bad");
        assert!(matches!(
            ok.failure::<u8, String>(),
            Err(Defect::OutcomeMismatch {
                expected: "failure",
                found: "success"
            })
        ));
        assert!(matches!(
            failed.success::<u8, String>(),
            Err(Defect::OutcomeMismatch { .. })
        ));
    }

    #[test]
    fn failure_guard_follows_outcome_tag() {
        let guard = is_output_failure::<u8, String>();

        assert!(guard.check(&event(Outcome::<u8, String>::Failure("x".into()))).unwrap());
        assert!(!guard.check(&event(Outcome::<u8, String>::Success(0))).unwrap());
    }

    #[test]
    fn success_guard_is_the_complement() {
        let guard = is_output_success::<u8, String>();

        assert!(guard.check(&event(Outcome::<u8, String>::Success(0))).unwrap());
        assert!(!guard.check(&event(Outcome::<u8, String>::Failure("x".into()))).unwrap());
    }

    #[test]
    fn guard_fails_loudly_on_foreign_payload() {
        let guard = is_output_failure::<u8, String>();

        assert!(matches!(
            guard.check(&event("not an outcome")),
            Err(Defect::PayloadMismatch { .. })
        ));
    }
}
