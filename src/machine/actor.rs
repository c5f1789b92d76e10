//! Running instance of a machine.

use super::error::MachineError;
use super::event::DoneEvent;
use super::{DoneTransition, Invoke, Machine};
use crate::core::{Defect, State, StateHistory, StateTransition, Trigger};
use chrono::Utc;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use uuid::Uuid;

/// Final view of an actor that reached a final state.
#[derive(Clone, Debug)]
pub struct Snapshot<S: State, C, O> {
    pub actor_id: Uuid,
    pub machine_id: String,
    pub state: S,
    pub context: C,
    pub output: O,
    pub history: StateHistory<S>,
}

impl<S: State, C, O> Snapshot<S, C, O> {
    /// Whether the actor finished in an error state.
    pub fn is_error(&self) -> bool {
        self.state.is_error()
    }
}

/// A machine definition plus the mutable state of one run.
///
/// Actors own their context; the definition is shared, so any number of
/// actors can run the same machine concurrently.
pub struct Actor<S: State, C, O> {
    id: Uuid,
    machine: Arc<Machine<S, C, O>>,
    state: S,
    context: C,
    history: StateHistory<S>,
    steps: usize,
    started: bool,
}

impl<S: State, C: 'static, O> Actor<S, C, O> {
    /// Create an actor positioned in the machine's initial state.
    /// Nothing runs, not even the initial entry actions, until the first
    /// [`Actor::step`] or [`Actor::run`].
    pub fn new(machine: Arc<Machine<S, C, O>>, context: C) -> Self {
        let state = machine.initial().clone();
        Self {
            id: Uuid::new_v4(),
            machine,
            state,
            context,
            history: StateHistory::new(),
            steps: 0,
            started: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    pub fn history(&self) -> &StateHistory<S> {
        &self.history
    }

    /// Whether the actor has started and reached a final state.
    pub fn is_done(&self) -> bool {
        self.started && self.state.is_final()
    }

    /// Enter the initial state and run until a final state is reached.
    pub async fn run(mut self) -> Result<Snapshot<S, C, O>, MachineError> {
        self.start()?;
        while !self.state.is_final() {
            self.step().await?;
        }
        self.finish()
    }

    /// Leave the current state once: take its `always` transition, or invoke
    /// its logic and follow the transition chosen by how it settles.
    ///
    /// The first call enters the initial state before stepping. Once the
    /// actor is in a final state, stepping does nothing.
    pub async fn step(&mut self) -> Result<(), MachineError> {
        self.start()?;
        if self.state.is_final() {
            return Ok(());
        }

        self.steps += 1;
        if self.steps > self.machine.max_steps() {
            return Err(MachineError::StepLimit {
                state: self.state.name().to_string(),
                limit: self.machine.max_steps(),
            });
        }

        let machine = Arc::clone(&self.machine);
        let node = machine
            .node(&self.state)
            .ok_or_else(|| self.unknown(&self.state))?;

        if let Some(always) = &node.always {
            for action in &always.actions {
                self.act(|context| {
                    action(context);
                    Ok(())
                })?;
            }
            return self.transition(always.target.clone(), Trigger::Always);
        }

        match &node.invoke {
            Some(invoke) => self.run_invoke(invoke).await,
            None => Err(MachineError::Stuck {
                state: self.state.name().to_string(),
            }),
        }
    }

    async fn run_invoke(&mut self, invoke: &Invoke<S, C>) -> Result<(), MachineError> {
        tracing::debug!(
            actor = %self.id,
            state = self.state.name(),
            src = invoke.src(),
            "invoking logic"
        );
        let settled = invoke.start(&self.context).await;
        let src = invoke.src().to_string();

        match settled {
            Ok(output) => {
                let event = DoneEvent::new(src.clone(), output);
                let chosen = self.select_done(invoke, &event)?;
                for action in &chosen.actions {
                    self.act(|context| action(context, &event))?;
                }
                self.transition(chosen.target.clone(), Trigger::Done { src })
            }
            Err(defect) => {
                let Some(on_error) = &invoke.on_error else {
                    tracing::warn!(
                        actor = %self.id,
                        state = self.state.name(),
                        %src,
                        %defect,
                        "unhandled rejection"
                    );
                    return Err(MachineError::Unhandled {
                        state: self.state.name().to_string(),
                        src,
                        source: defect,
                    });
                };
                tracing::debug!(actor = %self.id, %src, %defect, "logic rejected");
                for action in &on_error.actions {
                    self.act(|context| {
                        action(context, &defect);
                        Ok(())
                    })?;
                }
                self.transition(on_error.target.clone(), Trigger::Error { src })
            }
        }
    }

    fn select_done<'a>(
        &self,
        invoke: &'a Invoke<S, C>,
        event: &DoneEvent,
    ) -> Result<&'a DoneTransition<S, C>, MachineError> {
        for candidate in &invoke.on_done {
            let passed = match &candidate.guard {
                Some(guard) => panic::catch_unwind(AssertUnwindSafe(|| guard.check(event)))
                    .unwrap_or_else(|payload| Err(Defect::from_panic(payload)))
                    .map_err(|source| MachineError::Guard {
                        state: self.state.name().to_string(),
                        source,
                    })?,
                None => true,
            };
            if passed {
                return Ok(candidate);
            }
        }
        Err(MachineError::NoTransition {
            state: self.state.name().to_string(),
        })
    }

    fn transition(&mut self, target: S, trigger: Trigger) -> Result<(), MachineError> {
        tracing::debug!(
            actor = %self.id,
            from = self.state.name(),
            to = target.name(),
            ?trigger,
            "transition"
        );
        let from = std::mem::replace(&mut self.state, target.clone());
        self.history.push(StateTransition {
            from,
            to: target,
            timestamp: Utc::now(),
            trigger,
        });
        self.enter()
    }

    fn enter(&mut self) -> Result<(), MachineError> {
        let machine = Arc::clone(&self.machine);
        let node = machine
            .node(&self.state)
            .ok_or_else(|| self.unknown(&self.state))?;
        for action in &node.entry {
            self.act(|context| {
                action(context);
                Ok(())
            })?;
        }
        Ok(())
    }

    fn start(&mut self) -> Result<(), MachineError> {
        if self.started {
            return Ok(());
        }
        self.started = true;
        tracing::debug!(
            machine = %self.machine.id(),
            actor = %self.id,
            state = self.state.name(),
            "actor started"
        );
        self.enter()
    }

    /// Run a host action against the context. Errors and panics both stop
    /// the actor with [`MachineError::Action`].
    fn act<F>(&mut self, action: F) -> Result<(), MachineError>
    where
        F: FnOnce(&mut C) -> Result<(), Defect>,
    {
        let context = &mut self.context;
        panic::catch_unwind(AssertUnwindSafe(|| action(context)))
            .unwrap_or_else(|payload| Err(Defect::from_panic(payload)))
            .map_err(|source| {
                tracing::warn!(actor = %self.id, state = self.state.name(), %source, "action failed");
                MachineError::Action {
                    state: self.state.name().to_string(),
                    source,
                }
            })
    }

    fn unknown(&self, state: &S) -> MachineError {
        MachineError::UnknownState {
            machine: self.machine.id().to_string(),
            state: state.name().to_string(),
        }
    }

    fn finish(self) -> Result<Snapshot<S, C, O>, MachineError> {
        let output = panic::catch_unwind(AssertUnwindSafe(|| self.machine.output(&self.context)))
            .map_err(|payload| MachineError::Action {
                state: self.state.name().to_string(),
                source: Defect::from_panic(payload),
            })?;
        tracing::debug!(
            machine = %self.machine.id(),
            actor = %self.id,
            state = self.state.name(),
            steps = self.steps,
            "actor done"
        );
        Ok(Snapshot {
            actor_id: self.id,
            machine_id: self.machine.id().to_string(),
            state: self.state,
            context: self.context,
            output,
            history: self.history,
        })
    }
}
