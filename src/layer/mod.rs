//! Dependency bindings for effects.
//!
//! A computation names the capabilities it needs ([`Requirements`]). The
//! caller supplies a [`Layer`] that knows how to construct them; building the
//! layer yields a [`Context`], which is the environment the effect runs in.
//!
//! ```rust
//! use effect_logic::layer::{Capability, Layer, Requirements};
//! use std::sync::Arc;
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! struct Fixed(u64);
//! impl Clock for Fixed {
//!     fn now(&self) -> u64 {
//!         self.0
//!     }
//! }
//!
//! struct ClockTag;
//! impl Capability for ClockTag {
//!     const NAME: &'static str = "Clock";
//!     type Service = dyn Clock;
//! }
//!
//! let layer = Layer::succeed::<ClockTag>(Arc::new(Fixed(42)));
//! let context = layer.build().unwrap();
//!
//! context.ensure(&Requirements::new().with::<ClockTag>()).unwrap();
//! assert_eq!(context.get::<ClockTag>().unwrap().now(), 42);
//! ```

mod binding;
mod context;

pub use binding::Layer;
pub use context::Context;

use std::any::TypeId;

/// A named capability that effects can require.
///
/// The implementing type is only a tag; `Service` is what gets stored and
/// handed out, usually a trait object.
pub trait Capability: 'static {
    const NAME: &'static str;
    type Service: ?Sized + Send + Sync + 'static;
}

/// Ordered set of capabilities a computation needs before it can run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Requirements {
    entries: Vec<(TypeId, &'static str)>,
}

impl Requirements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `C` to the set. Adding it twice is a no-op.
    pub fn with<C: Capability>(mut self) -> Self {
        let id = TypeId::of::<C>();
        if !self.entries.iter().any(|(existing, _)| *existing == id) {
            self.entries.push((id, C::NAME));
        }
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(_, name)| *name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn entries(&self) -> &[(TypeId, &'static str)] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    impl Capability for A {
        const NAME: &'static str = "A";
        type Service = str;
    }

    struct B;
    impl Capability for B {
        const NAME: &'static str = "B";
        type Service = str;
    }

    #[test]
    fn requirements_keep_insertion_order() {
        let requirements = Requirements::new().with::<B>().with::<A>();
        assert_eq!(requirements.names().collect::<Vec<_>>(), vec!["B", "A"]);
    }

    #[test]
    fn requirements_ignore_duplicates() {
        let requirements = Requirements::new().with::<A>().with::<A>();
        assert_eq!(requirements.len(), 1);
        assert!(!requirements.is_empty());
    }
}
