//! Builder for a single state node.

use crate::builder::error::BuildError;
use crate::core::State;
use crate::machine::{Action, Always, Invoke, StateNode};
use std::sync::Arc;

/// Fluent builder for a [`StateNode`].
pub struct StateNodeBuilder<S: State, C> {
    state: S,
    entry: Vec<Action<C>>,
    always: Option<Always<S, C>>,
    invoke: Option<Invoke<S, C>>,
}

impl<S: State, C> StateNodeBuilder<S, C> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            entry: Vec::new(),
            always: None,
            invoke: None,
        }
    }

    /// Add an entry action. Entry actions run in the order added.
    pub fn entry<F>(mut self, action: F) -> Self
    where
        F: Fn(&mut C) + Send + Sync + 'static,
    {
        self.entry.push(Arc::new(action));
        self
    }

    pub fn always(mut self, always: Always<S, C>) -> Self {
        self.always = Some(always);
        self
    }

    pub fn invoke(mut self, invoke: Invoke<S, C>) -> Self {
        self.invoke = Some(invoke);
        self
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Build the node.
    /// Fails when the node both invokes and transitions eventlessly, or when
    /// a final state has any transition at all.
    pub fn build(self) -> Result<StateNode<S, C>, BuildError> {
        let has_always = self.always.is_some();
        let has_invoke = self.invoke.is_some();

        if has_always && has_invoke {
            return Err(BuildError::ConflictingNode {
                state: self.state.name().to_string(),
            });
        }
        if self.state.is_final() && (has_always || has_invoke) {
            return Err(BuildError::FinalWithTransitions {
                state: self.state.name().to_string(),
            });
        }

        Ok(StateNode {
            state: self.state,
            entry: self.entry,
            always: self.always,
            invoke: self.invoke,
        })
    }
}
