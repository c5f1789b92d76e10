//! State trait for hosting machine states.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for machine states.
///
/// States are plain values naming a position in a machine. The machine
/// looks nodes up by equality, stops on a final state, and reports
/// whether it ended in an error state.
///
/// # Example
///
/// ```rust
/// use effect_logic::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Step {
///     Init,
///     Ok,
///     Error,
///     Done,
/// }
///
/// impl State for Step {
///     fn name(&self) -> &str {
///         match self {
///             Self::Init => "Init",
///             Self::Ok => "Ok",
///             Self::Error => "Error",
///             Self::Done => "Done",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Done)
///     }
///
///     fn is_error(&self) -> bool {
///         matches!(self, Self::Error)
///     }
/// }
///
/// assert!(Step::Done.is_final());
/// assert!(!Step::Init.is_error());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Name used in logs, history and error messages.
    fn name(&self) -> &str;

    /// Reaching a final state stops the actor and computes its output.
    fn is_final(&self) -> bool {
        false
    }

    /// Error states are reported by [`Snapshot::is_error`](crate::machine::Snapshot::is_error).
    fn is_error(&self) -> bool {
        false
    }
}
