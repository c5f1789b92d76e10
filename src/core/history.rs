//! Transition history of a running actor.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What caused a transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trigger {
    /// Eventless transition taken as soon as the state was entered.
    Always,
    /// The invoked logic resolved.
    Done { src: String },
    /// The invoked logic rejected.
    Error { src: String },
}

/// Record of a single transition.
///
/// # Example
///
/// ```rust
/// use effect_logic::core::{State, StateTransition, Trigger};
/// use serde::{Deserialize, Serialize};
/// use chrono::Utc;
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Step { Init, Ok }
///
/// impl State for Step {
///     fn name(&self) -> &str {
///         match self {
///             Self::Init => "Init",
///             Self::Ok => "Ok",
///         }
///     }
/// }
///
/// let transition = StateTransition {
///     from: Step::Init,
///     to: Step::Ok,
///     timestamp: Utc::now(),
///     trigger: Trigger::Done { src: "demo".into() },
/// };
/// assert_eq!(transition.to, Step::Ok);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateTransition<S: State> {
    pub from: S,
    pub to: S,
    pub timestamp: DateTime<Utc>,
    pub trigger: Trigger,
}

/// Ordered history of transitions.
///
/// `record` is persistent (returns a new history); `push` appends in place
/// and is what the actor uses while running.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Return a new history with `transition` appended. `self` is unchanged.
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    pub fn push(&mut self, transition: StateTransition<S>) {
        self.transitions.push(transition);
    }

    /// States visited in order: the first source state, then every target.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.first() {
            path.push(&first.from);
        }
        path.extend(self.transitions.iter().map(|t| &t.to));
        path
    }

    /// Names of the visited states, handy for assertions and logs.
    pub fn path_names(&self) -> Vec<&str> {
        self.get_path().into_iter().map(|s| s.name()).collect()
    }

    /// Time between the first and the last recorded transition.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.first()?, self.transitions.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum Step {
        Init,
        Ok,
        Done,
    }

    impl State for Step {
        fn name(&self) -> &str {
            match self {
                Self::Init => "Init",
                Self::Ok => "Ok",
                Self::Done => "Done",
            }
        }

        fn is_final(&self) -> bool {
            matches!(self, Self::Done)
        }
    }

    fn transition(from: Step, to: Step, trigger: Trigger) -> StateTransition<Step> {
        StateTransition {
            from,
            to,
            timestamp: Utc::now(),
            trigger,
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: StateHistory<Step> = StateHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
    }

    #[test]
    fn record_leaves_original_untouched() {
        let history = StateHistory::new();
        let next = history.record(transition(Step::Init, Step::Ok, Trigger::Always));

        assert_eq!(history.len(), 0);
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn path_lists_visited_states() {
        let mut history = StateHistory::new();
        history.push(transition(
            Step::Init,
            Step::Ok,
            Trigger::Done { src: "demo".into() },
        ));
        history.push(transition(Step::Ok, Step::Done, Trigger::Always));

        assert_eq!(history.path_names(), vec!["Init", "Ok", "Done"]);
        assert_eq!(history.get_path()[2], &Step::Done);
    }

    #[test]
    fn duration_spans_first_to_last() {
        let start = Utc::now();
        let mut history = StateHistory::new();
        history.push(StateTransition {
            from: Step::Init,
            to: Step::Ok,
            timestamp: start,
            trigger: Trigger::Always,
        });
        history.push(StateTransition {
            from: Step::Ok,
            to: Step::Done,
            timestamp: start + chrono::Duration::milliseconds(25),
            trigger: Trigger::Always,
        });

        assert_eq!(history.duration(), Some(Duration::from_millis(25)));
    }

    #[test]
    fn history_serializes_with_triggers() {
        let mut history = StateHistory::new();
        history.push(transition(
            Step::Init,
            Step::Ok,
            Trigger::Error { src: "demo".into() },
        ));

        let json = serde_json::to_string(&history).unwrap();
        let back: StateHistory<Step> = serde_json::from_str(&json).unwrap();

        assert_eq!(
            back.transitions()[0].trigger,
            Trigger::Error { src: "demo".into() }
        );
    }
}
