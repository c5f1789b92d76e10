//! Guard predicates for choosing between transitions.
//!
//! Guards are pure functions over some value (a state, a done event) that
//! decide whether a transition may be taken. A guard can also refuse to
//! answer: when the value does not have the shape the guard relies on, it
//! reports a [`Defect`] instead of guessing.

use super::defect::Defect;
use std::sync::Arc;

/// Pure predicate deciding whether a transition may be taken.
///
/// # Example
///
/// ```rust
/// use effect_logic::core::Guard;
///
/// let positive = Guard::new(|n: &i32| *n > 0);
///
/// assert!(positive.check(&3).unwrap());
/// assert!(!positive.check(&-1).unwrap());
/// ```
pub struct Guard<T: ?Sized> {
    predicate: Arc<dyn Fn(&T) -> Result<bool, Defect> + Send + Sync>,
}

impl<T: ?Sized> Guard<T> {
    /// Create a guard from an infallible predicate.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(move |value| Ok(predicate(value))),
        }
    }

    /// Create a guard whose predicate can reject the value it is given.
    ///
    /// ```rust
    /// use effect_logic::core::{Defect, Guard};
    ///
    /// let short = Guard::try_new(|s: &str| {
    ///     if s.is_empty() {
    ///         return Err(Defect::Died("empty input".into()));
    ///     }
    ///     Ok(s.len() < 4)
    /// });
    ///
    /// assert!(short.check("abc").unwrap());
    /// assert!(short.check("").is_err());
    /// ```
    pub fn try_new<F>(predicate: F) -> Self
    where
        F: Fn(&T) -> Result<bool, Defect> + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Evaluate the guard. Deterministic and side-effect free.
    pub fn check(&self, value: &T) -> Result<bool, Defect> {
        (self.predicate)(value)
    }

    /// Guard that passes when `self` does not.
    pub fn not(self) -> Self
    where
        T: 'static,
    {
        let inner = self.predicate;
        Guard {
            predicate: Arc::new(move |value| inner(value).map(|passed| !passed)),
        }
    }
}

impl<T: ?Sized> Clone for Guard<T> {
    fn clone(&self) -> Self {
        Guard {
            predicate: Arc::clone(&self.predicate),
        }
    }
}
