//! Resolved capabilities an effect runs against.

use super::{Capability, Requirements};
use crate::core::Defect;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct Slot {
    pub(crate) name: &'static str,
    // Always an `Arc<C::Service>` for the capability the slot is keyed by.
    pub(crate) service: Arc<dyn Any + Send + Sync>,
}

/// Environment of every effect run by the adapters.
///
/// Cloning is cheap: the services are shared, never copied. A context is
/// only read by the adapters.
#[derive(Clone, Default)]
pub struct Context {
    slots: Arc<HashMap<TypeId, Slot>>,
}

impl Context {
    /// Context with no capabilities.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_slots(slots: HashMap<TypeId, Slot>) -> Self {
        Self {
            slots: Arc::new(slots),
        }
    }

    /// Return a context that also provides `C`, replacing any previous binding.
    pub fn with<C: Capability>(self, service: Arc<C::Service>) -> Self {
        let mut slots = Arc::unwrap_or_clone(self.slots);
        slots.insert(
            TypeId::of::<C>(),
            Slot {
                name: C::NAME,
                service: Arc::new(service),
            },
        );
        Self::from_slots(slots)
    }

    /// Resolve a capability.
    pub fn get<C: Capability>(&self) -> Result<Arc<C::Service>, Defect> {
        self.slots
            .get(&TypeId::of::<C>())
            .and_then(|slot| slot.service.downcast_ref::<Arc<C::Service>>())
            .cloned()
            .ok_or_else(|| Defect::MissingCapability {
                capability: C::NAME.to_string(),
            })
    }

    pub fn contains<C: Capability>(&self) -> bool {
        self.slots.contains_key(&TypeId::of::<C>())
    }

    /// Check that every required capability is present.
    ///
    /// Reports the first missing capability in requirement order.
    pub fn ensure(&self, requirements: &Requirements) -> Result<(), Defect> {
        match requirements
            .entries()
            .iter()
            .find(|(id, _)| !self.slots.contains_key(id))
        {
            Some((_, name)) => Err(Defect::MissingCapability {
                capability: (*name).to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Names of the provided capabilities, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.slots.values().map(|slot| slot.name).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("capabilities", &self.names())
            .finish()
    }
}
