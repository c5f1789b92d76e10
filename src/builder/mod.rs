//! Builders for machine definitions.
//!
//! Definitions are assembled fluently and validated once, in
//! [`MachineBuilder::build`]. A definition that builds has a declared
//! initial state, unique nodes, and transitions that only point at declared
//! states.
//!
//! ```
//! use effect_logic::builder::{MachineBuilder, StateNodeBuilder};
//! use effect_logic::machine::Always;
//! use effect_logic::state_enum;
//!
//! state_enum! {
//!     enum Light {
//!         Green,
//!         Off,
//!     }
//!     final: [Off]
//! }
//!
//! let machine = MachineBuilder::new("light")
//!     .initial(Light::Green)
//!     .state(StateNodeBuilder::new(Light::Green).always(Always::to(Light::Off)))
//!     .state(StateNodeBuilder::new(Light::Off))
//!     .output(|count: &u32| *count)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(machine.id(), "light");
//! ```

pub mod error;
pub mod machine;
pub mod macros;
pub mod node;

pub use error::BuildError;
pub use machine::MachineBuilder;
pub use node::StateNodeBuilder;
