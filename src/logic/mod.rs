//! Promise-style actor logic built from effects and async functions.
//!
//! Every adapter implements [`PromiseLogic`]: given an input it starts one
//! asynchronous operation that either resolves with the logic's output or
//! rejects with a [`Defect`]. The hosting machine invokes the logic from a
//! state and branches on how the operation settles.
//!
//! | constructor                 | input                          | output          |
//! |-----------------------------|--------------------------------|-----------------|
//! | [`from_effect`]             | [`EffectInput`] (args + layer) | `Outcome<T, E>` |
//! | [`from_function`]           | positional tuple               | `T`             |
//! | [`from_unary`]              | the single argument            | `T`             |
//! | [`from_declared_effect`]    | `(Arc<Declarations>, args)`    | `Outcome<T, E>` |
//!
//! Effect-backed adapters keep declared failures inside the
//! [`Outcome`](crate::core::Outcome); plain functions have no such channel
//! and reject on any error. Panics raised while building or running the
//! computation always reject with [`Defect::Panicked`].

mod declared;
mod effect;
mod function;

pub use declared::{from_declared_effect, DeclaredComputation, DeclaredEffectLogic, Declarations};
pub use effect::{die, fail_with, from_effect, service, EffectInput, EffectLogic};
pub use function::{from_function, from_unary, FunctionLogic, UnaryLogic};

use crate::core::Defect;
use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::panic::AssertUnwindSafe;

/// Asynchronous operation started by a [`PromiseLogic`].
pub type LogicFuture<T> = BoxFuture<'static, Result<T, Defect>>;

/// Logic that can be invoked by a machine state.
///
/// Implementations hold no per-call state: each `start` is independent and
/// the same logic value may have any number of operations in flight.
pub trait PromiseLogic: Send + Sync + 'static {
    type Input: Send + 'static;
    type Output: Send + 'static;

    fn start(&self, input: Self::Input) -> LogicFuture<Self::Output>;
}

/// A function called with its arguments spread from a tuple.
///
/// Implemented for every `Fn` of arity zero to six, so the argument tuple of
/// an adapter is inferred from the wrapped function's signature.
pub trait Positional<Args>: Send + Sync + 'static {
    type Output;

    fn call(&self, args: Args) -> Self::Output;
}

macro_rules! impl_positional {
    ($($arg:ident),*) => {
        impl<Func, Out, $($arg),*> Positional<($($arg,)*)> for Func
        where
            Func: Fn($($arg),*) -> Out + Send + Sync + 'static,
        {
            type Output = Out;

            #[allow(non_snake_case)]
            fn call(&self, ($($arg,)*): ($($arg,)*)) -> Out {
                (self)($($arg),*)
            }
        }
    };
}

impl_positional!();
impl_positional!(A1);
impl_positional!(A1, A2);
impl_positional!(A1, A2, A3);
impl_positional!(A1, A2, A3, A4);
impl_positional!(A1, A2, A3, A4, A5);
impl_positional!(A1, A2, A3, A4, A5, A6);

/// Drive `operation` to completion, turning panics into rejections.
pub(crate) fn settle<T, Fut>(kind: &'static str, operation: Fut) -> LogicFuture<T>
where
    T: Send + 'static,
    Fut: Future<Output = Result<T, Defect>> + Send + 'static,
{
    async move {
        tracing::trace!(kind, "logic started");
        let settled = match AssertUnwindSafe(operation).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => Err(Defect::from_panic(payload)),
        };
        match &settled {
            Ok(_) => tracing::trace!(kind, "logic resolved"),
            Err(defect) => tracing::debug!(kind, %defect, "logic rejected"),
        }
        settled
    }
    .boxed()
}
