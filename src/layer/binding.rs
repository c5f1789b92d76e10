//! Constructible providers of capabilities.

use super::context::{Context, Slot};
use super::Capability;
use crate::core::Defect;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type Constructor = Arc<dyn Fn() -> Result<Arc<dyn Any + Send + Sync>, Defect> + Send + Sync>;

#[derive(Clone)]
struct Provision {
    id: TypeId,
    name: &'static str,
    construct: Constructor,
}

/// A provider of one or more capabilities.
///
/// Layers are descriptions: nothing is constructed until [`Layer::build`]
/// runs, and every build constructs fresh services from the constructors.
/// When two merged layers provide the same capability, the one merged last
/// wins.
#[derive(Clone, Default)]
pub struct Layer {
    provisions: Vec<Provision>,
}

impl Layer {
    /// Layer that provides nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Layer providing an already constructed service.
    pub fn succeed<C: Capability>(service: Arc<C::Service>) -> Self {
        Self::from_fn::<C, _, std::convert::Infallible>(move || Ok(Arc::clone(&service)))
    }

    /// Layer whose service is constructed on every build and may fail to
    /// construct. A construction failure is a defect, not a declared failure.
    pub fn from_fn<C, F, E>(construct: F) -> Self
    where
        C: Capability,
        F: Fn() -> Result<Arc<C::Service>, E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        let construct: Constructor = Arc::new(move || {
            construct()
                .map(|service| Arc::new(service) as Arc<dyn Any + Send + Sync>)
                .map_err(|error| Defect::LayerBuild {
                    capability: C::NAME.to_string(),
                    reason: error.to_string(),
                })
        });
        Self {
            provisions: vec![Provision {
                id: TypeId::of::<C>(),
                name: C::NAME,
                construct,
            }],
        }
    }

    /// Combine two layers into one providing the union of their capabilities.
    pub fn merge(mut self, other: Layer) -> Self {
        self.provisions.extend(other.provisions);
        self
    }

    pub fn merge_all<I>(layers: I) -> Self
    where
        I: IntoIterator<Item = Layer>,
    {
        layers.into_iter().fold(Layer::empty(), Layer::merge)
    }

    /// Names of the provided capabilities, in provision order, without duplicates.
    pub fn capabilities(&self) -> Vec<&'static str> {
        let mut names = Vec::with_capacity(self.provisions.len());
        for provision in &self.provisions {
            if !names.contains(&provision.name) {
                names.push(provision.name);
            }
        }
        names
    }

    /// Construct every provided service and collect them into a context.
    ///
    /// Stops at the first constructor that fails.
    pub fn build(&self) -> Result<Context, Defect> {
        let mut slots = HashMap::with_capacity(self.provisions.len());
        for provision in &self.provisions {
            let service = (provision.construct)()?;
            slots.insert(
                provision.id,
                Slot {
                    name: provision.name,
                    service,
                },
            );
        }
        tracing::trace!(capabilities = ?self.capabilities(), "layer built");
        Ok(Context::from_slots(slots))
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer")
            .field("capabilities", &self.capabilities())
            .finish()
    }
}
