//! Logic from plain async functions.
//!
//! No layer, no outcome: the operation resolves with whatever the function
//! returns in `Ok` and rejects with its error, wrapped in
//! [`Defect::Rejected`].

use super::{settle, LogicFuture, Positional, PromiseLogic};
use crate::core::{BoxError, Defect};
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

/// Logic calling an async function with positional arguments.
pub struct FunctionLogic<F, Args> {
    function: Arc<F>,
    _args: PhantomData<fn(Args)>,
}

/// Wrap an async function taking any number (up to six) of arguments.
/// The logic's input is the tuple of those arguments.
///
/// ```rust
/// use effect_logic::logic::{from_function, PromiseLogic};
///
/// async fn add(a: u32, b: u32) -> Result<u32, std::io::Error> {
///     Ok(a + b)
/// }
///
/// # futures::executor::block_on(async {
/// let logic = from_function(add);
/// assert_eq!(logic.start((2, 3)).await.unwrap(), 5);
/// # });
/// ```
pub fn from_function<F, Args>(function: F) -> FunctionLogic<F, Args> {
    FunctionLogic {
        function: Arc::new(function),
        _args: PhantomData,
    }
}

impl<F, Args> Clone for FunctionLogic<F, Args> {
    fn clone(&self) -> Self {
        Self {
            function: Arc::clone(&self.function),
            _args: PhantomData,
        }
    }
}

impl<F, Args, Fut, T, X> PromiseLogic for FunctionLogic<F, Args>
where
    F: Positional<Args, Output = Fut>,
    Fut: Future<Output = Result<T, X>> + Send + 'static,
    X: Into<BoxError>,
    Args: Send + 'static,
    T: Send + 'static,
{
    type Input = Args;
    type Output = T;

    fn start(&self, args: Args) -> LogicFuture<T> {
        let function = Arc::clone(&self.function);
        settle("function", async move {
            function
                .call(args)
                .await
                .map_err(|error| Defect::Rejected(error.into()))
        })
    }
}

/// Logic calling an async function of exactly one argument, passed as is.
pub struct UnaryLogic<F, A> {
    function: Arc<F>,
    _arg: PhantomData<fn(A)>,
}

/// Wrap an async function of one argument. The logic's input is that
/// argument, not a one-element tuple.
pub fn from_unary<F, A, Fut>(function: F) -> UnaryLogic<F, A>
where
    F: Fn(A) -> Fut + Send + Sync + 'static,
{
    UnaryLogic {
        function: Arc::new(function),
        _arg: PhantomData,
    }
}

impl<F, A> Clone for UnaryLogic<F, A> {
    fn clone(&self) -> Self {
        Self {
            function: Arc::clone(&self.function),
            _arg: PhantomData,
        }
    }
}

impl<F, A, Fut, T, X> PromiseLogic for UnaryLogic<F, A>
where
    F: Fn(A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, X>> + Send + 'static,
    X: Into<BoxError>,
    A: Send + 'static,
    T: Send + 'static,
{
    type Input = A;
    type Output = T;

    fn start(&self, arg: A) -> LogicFuture<T> {
        let function = Arc::clone(&self.function);
        settle("unary", async move {
            function(arg)
                .await
                .map_err(|error| Defect::Rejected(error.into()))
        })
    }
}
