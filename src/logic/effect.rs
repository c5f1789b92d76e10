//! Effect-backed logic: run an effect under an explicit layer and report
//! its outcome.

use super::{settle, LogicFuture, Positional, PromiseLogic};
use crate::core::{Cause, Defect, Outcome};
use crate::layer::{Capability, Context, Layer, Requirements};
use std::marker::PhantomData;
use std::sync::Arc;
use stillwater::effect::Effect;
use stillwater::prelude::*;

/// Input of an effect-backed logic: the positional arguments of the
/// computation and the layer providing its requirements.
#[derive(Clone, Debug)]
pub struct EffectInput<Args> {
    pub args: Args,
    pub layer: Layer,
}

impl<Args> EffectInput<Args> {
    pub fn new(args: Args, layer: Layer) -> Self {
        Self { args, layer }
    }
}

/// Logic that turns a computation returning an effect into an operation
/// resolving to an [`Outcome`].
///
/// Declared failures (`Cause::Fail`) resolve as `Outcome::Failure`.
/// Everything else rejects: a layer that fails to build, a requirement the
/// layer does not provide, `Cause::Die`, or a panic.
pub struct EffectLogic<F, Args> {
    computation: Arc<F>,
    requirements: Requirements,
    _args: PhantomData<fn(Args)>,
}

/// Wrap a computation as effect-backed logic.
///
/// The computation takes its arguments positionally; the logic's input is
/// `EffectInput<(A1, .., An)>` and its output `Outcome<T, E>` where the
/// computation returns `impl Effect<Output = T, Error = Cause<E>, Env = Context>`.
///
/// ```rust
/// use effect_logic::core::{Cause, Outcome};
/// use effect_logic::layer::{Context, Layer};
/// use effect_logic::logic::{fail_with, from_effect, EffectInput, PromiseLogic};
/// use stillwater::effect::Effect;
/// use stillwater::prelude::*;
///
/// fn halve(n: u32) -> impl Effect<Output = u32, Error = Cause<String>, Env = Context> {
///     from_fn(move |_: &Context| {
///         if n % 2 == 0 {
///             Ok(n / 2)
///         } else {
///             Err(Cause::Fail(format!("{n} is odd")))
///         }
///     })
/// }
///
/// # futures::executor::block_on(async {
/// let logic = from_effect(halve);
/// let outcome = logic.start(EffectInput::new((8,), Layer::empty())).await.unwrap();
/// assert_eq!(outcome, Outcome::Success(4));
///
/// let outcome = logic.start(EffectInput::new((3,), Layer::empty())).await.unwrap();
/// assert_eq!(outcome, Outcome::Failure("3 is odd".to_string()));
/// # });
/// ```
pub fn from_effect<F, Args>(computation: F) -> EffectLogic<F, Args> {
    EffectLogic {
        computation: Arc::new(computation),
        requirements: Requirements::new(),
        _args: PhantomData,
    }
}

impl<F, Args> EffectLogic<F, Args> {
    /// Declare a capability the computation needs. The built context is
    /// checked against every declared capability before the effect runs.
    pub fn requires<C: Capability>(mut self) -> Self {
        self.requirements = self.requirements.with::<C>();
        self
    }

    pub fn requirements(&self) -> &Requirements {
        &self.requirements
    }
}

impl<F, Args> Clone for EffectLogic<F, Args> {
    fn clone(&self) -> Self {
        Self {
            computation: Arc::clone(&self.computation),
            requirements: self.requirements.clone(),
            _args: PhantomData,
        }
    }
}

impl<F, Args, Eff, T, E> PromiseLogic for EffectLogic<F, Args>
where
    F: Positional<Args, Output = Eff>,
    Eff: Effect<Output = T, Error = Cause<E>, Env = Context> + Send + 'static,
    Args: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    type Input = EffectInput<Args>;
    type Output = Outcome<T, E>;

    fn start(&self, input: EffectInput<Args>) -> LogicFuture<Outcome<T, E>> {
        let computation = Arc::clone(&self.computation);
        let requirements = self.requirements.clone();
        settle("effect", async move {
            let EffectInput { args, layer } = input;
            let effect = computation.call(args);
            let context = layer.build()?;
            context.ensure(&requirements)?;
            run_to_outcome(effect, &context).await
        })
    }
}

/// Run `effect` once and sort its result into outcome or defect.
pub(crate) async fn run_to_outcome<Eff, T, E>(
    effect: Eff,
    context: &Context,
) -> Result<Outcome<T, E>, Defect>
where
    Eff: Effect<Output = T, Error = Cause<E>, Env = Context>,
{
    match effect.run(context).await {
        Ok(value) => Ok(Outcome::Success(value)),
        Err(Cause::Fail(error)) => Ok(Outcome::Failure(error)),
        Err(Cause::Die(defect)) => Err(defect),
    }
}

/// Effect resolving capability `C` from the context.
///
/// A missing capability is a defect (`Cause::Die`), never a declared failure.
pub fn service<C, E>() -> impl Effect<Output = Arc<C::Service>, Error = Cause<E>, Env = Context>
where
    C: Capability,
    E: Send + 'static,
{
    from_fn(|context: &Context| context.get::<C>().map_err(Cause::Die))
}

/// Effect that fails with a declared failure.
pub fn fail_with<T, E>(error: E) -> impl Effect<Output = T, Error = Cause<E>, Env = Context>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fail(Cause::Fail(error))
}

/// Effect that dies with a defect carrying `message`.
pub fn die<T, E>(message: impl Into<String>) -> impl Effect<Output = T, Error = Cause<E>, Env = Context>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fail(Cause::Die(Defect::Died(message.into())))
}
