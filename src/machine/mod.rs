//! Hosting state machine that invokes promise logic from its states.
//!
//! A machine is a flat set of state nodes. On entering a node the machine
//! runs its entry actions, then either:
//! - takes its `always` transition immediately,
//! - invokes a [`PromiseLogic`] and waits for it to settle, choosing the
//!   first `on_done` transition whose guard passes, or the `on_error`
//!   transition when the logic rejects,
//! - or stops, when the state is final.
//!
//! Definitions are immutable once built (see [`crate::builder`]); running
//! them is the job of [`Actor`].

mod actor;
mod error;
mod event;

pub use actor::{Actor, Snapshot};
pub use error::MachineError;
pub use event::{is_output_failure, is_output_success, DoneEvent};

use crate::core::{Defect, Guard, State};
use crate::logic::{LogicFuture, PromiseLogic};
use futures::future::{self, FutureExt};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Step limit used when a machine does not set its own.
pub const DEFAULT_MAX_STEPS: usize = 1000;

/// Context update run on entry or on an eventless transition.
pub type Action<C> = Arc<dyn Fn(&mut C) + Send + Sync>;

/// Context update run on a done transition. May read the event payload,
/// which can fail.
pub type DoneAction<C> = Arc<dyn Fn(&mut C, &DoneEvent) -> Result<(), Defect> + Send + Sync>;

/// Context update run on an error transition.
pub type ErrorAction<C> = Arc<dyn Fn(&mut C, &Defect) + Send + Sync>;

type Starter<C> = Arc<dyn Fn(&C) -> LogicFuture<Box<dyn Any + Send>> + Send + Sync>;

/// Eventless transition.
pub struct Always<S: State, C> {
    pub(crate) target: S,
    pub(crate) actions: Vec<Action<C>>,
}

impl<S: State, C> Always<S, C> {
    pub fn to(target: S) -> Self {
        Self {
            target,
            actions: Vec::new(),
        }
    }

    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        self.actions.push(Arc::new(action));
        self
    }

    pub fn target(&self) -> &S {
        &self.target
    }
}

/// Transition taken when the invoked logic resolves.
pub struct DoneTransition<S: State, C> {
    pub(crate) guard: Option<Guard<DoneEvent>>,
    pub(crate) target: S,
    pub(crate) actions: Vec<DoneAction<C>>,
}

impl<S: State, C> DoneTransition<S, C> {
    pub fn to(target: S) -> Self {
        Self {
            guard: None,
            target,
            actions: Vec::new(),
        }
    }

    pub fn when(mut self, guard: Guard<DoneEvent>) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut C, &DoneEvent) -> Result<(), Defect> + Send + Sync + 'static,
    {
        self.actions.push(Arc::new(action));
        self
    }

    pub fn target(&self) -> &S {
        &self.target
    }
}

/// Transition taken when the invoked logic rejects.
pub struct ErrorTransition<S: State, C> {
    pub(crate) target: S,
    pub(crate) actions: Vec<ErrorAction<C>>,
}

impl<S: State, C> ErrorTransition<S, C> {
    pub fn to(target: S) -> Self {
        Self {
            target,
            actions: Vec::new(),
        }
    }

    pub fn action<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut C, &Defect) + Send + Sync + 'static,
    {
        self.actions.push(Arc::new(action));
        self
    }

    pub fn target(&self) -> &S {
        &self.target
    }
}

/// Logic invoked by a state, with the transitions that follow it.
pub struct Invoke<S: State, C> {
    src: String,
    starter: Starter<C>,
    pub(crate) on_done: Vec<DoneTransition<S, C>>,
    pub(crate) on_error: Option<ErrorTransition<S, C>>,
}

impl<S: State, C: 'static> Invoke<S, C> {
    /// Invoke `logic` under the name `src`, building its input from the
    /// machine context each time the state is entered.
    pub fn new<L, I>(src: impl Into<String>, logic: L, input: I) -> Self
    where
        L: PromiseLogic,
        I: Fn(&C) -> L::Input + Send + Sync + 'static,
    {
        let logic = Arc::new(logic);
        let starter: Starter<C> = Arc::new(move |context: &C| {
            // A panic while building the input rejects like one in the logic.
            let started = panic::catch_unwind(AssertUnwindSafe(|| logic.start(input(context))));
            match started {
                Ok(operation) => operation
                    .map(|settled| settled.map(|output| Box::new(output) as Box<dyn Any + Send>))
                    .boxed(),
                Err(payload) => future::ready(Err(Defect::from_panic(payload))).boxed(),
            }
        });
        Self {
            src: src.into(),
            starter,
            on_done: Vec::new(),
            on_error: None,
        }
    }
}

impl<S: State, C> Invoke<S, C> {
    /// Unguarded done transition. Transitions are tried in the order added.
    pub fn on_done(self, target: S) -> Self {
        self.on_done_transition(DoneTransition::to(target))
    }

    pub fn on_done_when(self, guard: Guard<DoneEvent>, target: S) -> Self {
        self.on_done_transition(DoneTransition::to(target).when(guard))
    }

    pub fn on_done_transition(mut self, transition: DoneTransition<S, C>) -> Self {
        self.on_done.push(transition);
        self
    }

    pub fn on_error(self, target: S) -> Self {
        self.on_error_transition(ErrorTransition::to(target))
    }

    pub fn on_error_transition(mut self, transition: ErrorTransition<S, C>) -> Self {
        self.on_error = Some(transition);
        self
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub(crate) fn start(&self, context: &C) -> LogicFuture<Box<dyn Any + Send>> {
        (self.starter)(context)
    }

    pub(crate) fn targets(&self) -> impl Iterator<Item = &S> {
        self.on_done
            .iter()
            .map(|t| &t.target)
            .chain(self.on_error.iter().map(|t| &t.target))
    }
}

/// A state together with what happens in it.
pub struct StateNode<S: State, C> {
    pub(crate) state: S,
    pub(crate) entry: Vec<Action<C>>,
    pub(crate) always: Option<Always<S, C>>,
    pub(crate) invoke: Option<Invoke<S, C>>,
}

impl<S: State, C> StateNode<S, C> {
    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn invoke(&self) -> Option<&Invoke<S, C>> {
        self.invoke.as_ref()
    }

    pub(crate) fn targets(&self) -> Vec<&S> {
        let mut targets: Vec<&S> = self.always.iter().map(|a| &a.target).collect();
        if let Some(invoke) = &self.invoke {
            targets.extend(invoke.targets());
        }
        targets
    }
}

/// Immutable machine definition.
pub struct Machine<S: State, C, O> {
    pub(crate) id: String,
    pub(crate) initial: S,
    pub(crate) nodes: Vec<StateNode<S, C>>,
    pub(crate) output: Arc<dyn Fn(&C) -> O + Send + Sync>,
    pub(crate) max_steps: usize,
}

impl<S: State, C, O> Machine<S, C, O> {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn initial(&self) -> &S {
        &self.initial
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn node(&self, state: &S) -> Option<&StateNode<S, C>> {
        self.nodes.iter().find(|node| node.state == *state)
    }

    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.nodes.iter().map(|node| &node.state)
    }

    pub(crate) fn output(&self, context: &C) -> O {
        (self.output)(context)
    }
}

impl<S: State, C, O> fmt::Debug for Machine<S, C, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Machine")
            .field("id", &self.id)
            .field("initial", &self.initial)
            .field(
                "states",
                &self.nodes.iter().map(|n| n.state.name()).collect::<Vec<_>>(),
            )
            .field("max_steps", &self.max_steps)
            .finish()
    }
}
