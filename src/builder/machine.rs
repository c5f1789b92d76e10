//! Builder for constructing machine definitions.

use crate::builder::error::BuildError;
use crate::builder::node::StateNodeBuilder;
use crate::core::State;
use crate::machine::{Machine, StateNode, DEFAULT_MAX_STEPS};
use std::sync::Arc;

enum PendingNode<S: State, C> {
    Builder(StateNodeBuilder<S, C>),
    Built(StateNode<S, C>),
}

/// Builder for machine definitions with a fluent API.
pub struct MachineBuilder<S: State, C, O> {
    id: String,
    initial: Option<S>,
    nodes: Vec<PendingNode<S, C>>,
    output: Option<Arc<dyn Fn(&C) -> O + Send + Sync>>,
    max_steps: usize,
}

impl<S: State, C, O> MachineBuilder<S, C, O> {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            initial: None,
            nodes: Vec::new(),
            output: None,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Add a node. The node is validated when the machine is built.
    pub fn state(mut self, node: StateNodeBuilder<S, C>) -> Self {
        self.nodes.push(PendingNode::Builder(node));
        self
    }

    /// Add a pre-built node.
    pub fn add_node(mut self, node: StateNode<S, C>) -> Self {
        self.nodes.push(PendingNode::Built(node));
        self
    }

    /// Set how the machine output is computed from the final context
    /// (required).
    pub fn output<F>(mut self, output: F) -> Self
    where
        F: Fn(&C) -> O + Send + Sync + 'static,
    {
        self.output = Some(Arc::new(output));
        self
    }

    /// Bound the number of steps an actor may take.
    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Build the machine.
    /// Returns an error if required fields are missing or the graph refers
    /// to undeclared states.
    pub fn build(self) -> Result<Machine<S, C, O>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;
        let output = self.output.ok_or(BuildError::MissingOutput)?;

        if self.nodes.is_empty() {
            return Err(BuildError::NoStates);
        }
        if self.max_steps == 0 {
            return Err(BuildError::ZeroStepLimit);
        }

        let nodes = self
            .nodes
            .into_iter()
            .map(|pending| match pending {
                PendingNode::Builder(builder) => builder.build(),
                PendingNode::Built(node) => Ok(node),
            })
            .collect::<Result<Vec<_>, _>>()?;

        for (index, node) in nodes.iter().enumerate() {
            if nodes[..index].iter().any(|other| other.state == node.state) {
                return Err(BuildError::DuplicateState {
                    state: node.state.name().to_string(),
                });
            }
        }

        let declared = |state: &S| nodes.iter().any(|node| node.state == *state);

        if !declared(&initial) {
            return Err(BuildError::UndeclaredInitial {
                state: initial.name().to_string(),
            });
        }
        for node in &nodes {
            if let Some(target) = node.targets().into_iter().find(|t| !declared(t)) {
                return Err(BuildError::UnknownTarget {
                    from: node.state.name().to_string(),
                    to: target.name().to_string(),
                });
            }
        }

        tracing::trace!(machine = %self.id, states = nodes.len(), "machine built");

        Ok(Machine {
            id: self.id,
            initial,
            nodes,
            output,
            max_steps: self.max_steps,
        })
    }
}
