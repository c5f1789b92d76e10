//! Effect Logic: promise-style actor logic built from Stillwater effects
//!
//! A state machine state can invoke asynchronous work and branch on how it
//! settles. This crate adapts effect computations to that shape: an effect
//! runs once against a dependency [`Layer`](layer::Layer), and its result is
//! reported as a two-branch [`Outcome`](core::Outcome). Declared failures
//! resolve as `Outcome::Failure`; defects (missing dependencies, panics,
//! explicit deaths) reject the operation instead.
//!
//! # Modules
//!
//! - [`core`]: outcome, error taxonomy, states, guards and history
//! - [`layer`]: capabilities, layers and the contexts effects run in
//! - [`logic`]: the [`PromiseLogic`](logic::PromiseLogic) adapters
//! - [`machine`]: a flat hosting machine and the actor that runs it
//! - [`builder`]: validated builders for machine definitions
//!
//! # Example
//!
//! ```rust
//! use effect_logic::builder::{MachineBuilder, StateNodeBuilder};
//! use effect_logic::core::Cause;
//! use effect_logic::layer::{Context, Layer};
//! use effect_logic::logic::{from_effect, EffectInput};
//! use effect_logic::machine::{is_output_failure, Actor, Invoke};
//! use effect_logic::state_enum;
//! use std::sync::Arc;
//! use stillwater::prelude::*;
//!
//! state_enum! {
//!     enum Check {
//!         Running,
//!         Passed,
//!         Rejected,
//!     }
//!     final: [Passed, Rejected]
//! }
//!
//! let positive = from_effect(|n: i64| {
//!     from_fn(move |_: &Context| {
//!         if n > 0 {
//!             Ok(n)
//!         } else {
//!             Err(Cause::Fail("not positive".to_string()))
//!         }
//!     })
//! });
//!
//! let machine = MachineBuilder::new("check")
//!     .initial(Check::Running)
//!     .state(
//!         StateNodeBuilder::new(Check::Running).invoke(
//!             Invoke::new("positive", positive, |n: &i64| {
//!                 EffectInput::new((*n,), Layer::empty())
//!             })
//!             .on_done_when(is_output_failure::<i64, String>(), Check::Rejected)
//!             .on_done(Check::Passed),
//!         ),
//!     )
//!     .state(StateNodeBuilder::new(Check::Passed))
//!     .state(StateNodeBuilder::new(Check::Rejected))
//!     .output(|n: &i64| *n)
//!     .build()
//!     .unwrap();
//!
//! # futures::executor::block_on(async {
//! let snapshot = Actor::new(Arc::new(machine), -3).run().await.unwrap();
//! assert_eq!(snapshot.state, Check::Rejected);
//! # });
//! ```

pub mod builder;
pub mod core;
pub mod layer;
pub mod logic;
pub mod machine;

pub use crate::core::{Cause, Defect, Outcome, State};
pub use crate::layer::{Capability, Context, Layer, Requirements};
pub use crate::logic::PromiseLogic;
pub use crate::machine::{Actor, Machine, Snapshot};
