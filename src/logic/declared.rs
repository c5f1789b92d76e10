//! Logic selected by key from a map of declared computations.
//!
//! The machine definition only names the computation; the computations and
//! the services they run against arrive later, as part of the input. This is
//! how an implementation is supplied entirely from outside the machine.

use super::effect::run_to_outcome;
use super::{settle, LogicFuture, PromiseLogic};
use crate::core::{Cause, Defect, Outcome};
use crate::layer::Context;
use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use stillwater::effect::{BoxedEffect, Effect};
use stillwater::prelude::*;

/// A declared computation with its effect type erased.
pub type DeclaredComputation<Args, T, E> =
    Arc<dyn Fn(Args) -> BoxedEffect<T, Cause<E>, Context> + Send + Sync>;

struct Entry {
    signature: &'static str,
    // Always a `DeclaredComputation<Args, T, E>` matching `signature`.
    computation: Arc<dyn Any + Send + Sync>,
}

/// Computations by key, plus the concrete services they run against.
///
/// Each key keeps its own argument, success and failure types. The logic
/// selecting a key states the types it expects; a key declared with other
/// types rejects with [`Defect::PayloadMismatch`].
#[derive(Default)]
pub struct Declarations {
    computations: HashMap<String, Entry>,
    services: Context,
}

impl Declarations {
    pub fn new(services: Context) -> Self {
        Self {
            computations: HashMap::new(),
            services,
        }
    }

    /// Declare `computation` under `key`, replacing any earlier declaration.
    pub fn declare<Args, T, E, F, Eff>(mut self, key: impl Into<String>, computation: F) -> Self
    where
        Args: 'static,
        T: Send + 'static,
        E: Send + 'static,
        F: Fn(Args) -> Eff + Send + Sync + 'static,
        Eff: Effect<Output = T, Error = Cause<E>, Env = Context> + Send + 'static,
    {
        let erased: DeclaredComputation<Args, T, E> =
            Arc::new(move |args| computation(args).boxed());
        self.computations.insert(
            key.into(),
            Entry {
                signature: type_name::<DeclaredComputation<Args, T, E>>(),
                computation: Arc::new(erased),
            },
        );
        self
    }

    /// The computation declared under `key`, if it has these types.
    pub fn get<Args, T, E>(&self, key: &str) -> Option<DeclaredComputation<Args, T, E>>
    where
        Args: 'static,
        T: 'static,
        E: 'static,
    {
        self.lookup(key).ok()
    }

    fn lookup<Args, T, E>(&self, key: &str) -> Result<DeclaredComputation<Args, T, E>, Defect>
    where
        Args: 'static,
        T: 'static,
        E: 'static,
    {
        let entry = self
            .computations
            .get(key)
            .ok_or_else(|| Defect::UnknownLogic {
                key: key.to_string(),
            })?;
        entry
            .computation
            .downcast_ref::<DeclaredComputation<Args, T, E>>()
            .cloned()
            .ok_or(Defect::PayloadMismatch {
                expected: type_name::<DeclaredComputation<Args, T, E>>(),
            })
    }

    /// Declared keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<_> = self.computations.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn services(&self) -> &Context {
        &self.services
    }
}

impl fmt::Debug for Declarations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<_> = self
            .computations
            .iter()
            .map(|(key, entry)| (key.as_str(), entry.signature))
            .collect();
        entries.sort_unstable();
        f.debug_struct("Declarations")
            .field("computations", &entries)
            .field("services", &self.services)
            .finish()
    }
}

/// Logic running the computation declared under a fixed key.
pub struct DeclaredEffectLogic<Args, T, E> {
    key: String,
    _types: PhantomData<fn(Args) -> (T, E)>,
}

/// Select the declared computation named `key` when the logic starts.
///
/// The input is the declarations together with the computation's arguments.
/// An unknown key rejects with [`Defect::UnknownLogic`]; a key declared with
/// other argument or result types rejects with [`Defect::PayloadMismatch`].
///
/// ```rust
/// use effect_logic::core::{Cause, Outcome};
/// use effect_logic::layer::Context;
/// use effect_logic::logic::{from_declared_effect, Declarations, PromiseLogic};
/// use std::sync::Arc;
/// use stillwater::prelude::*;
///
/// let declarations = Arc::new(
///     Declarations::new(Context::empty())
///         .declare("build_message", |words: Vec<String>| {
///             from_fn(move |_: &Context| {
///                 if words.is_empty() {
///                     Err(Cause::Fail("Array is empty!".to_string()))
///                 } else {
///                     Ok(words.join(" "))
///                 }
///             })
///         })
///         .declare("double", |n: usize| {
///             from_fn(move |_: &Context| Ok::<_, Cause<String>>(n * 2))
///         }),
/// );
///
/// let logic = from_declared_effect::<Vec<String>, String, String>("build_message");
/// # futures::executor::block_on(async {
/// let outcome = logic
///     .start((declarations, vec!["I".to_string(), "hope".to_string()]))
///     .await
///     .unwrap();
/// assert_eq!(outcome, Outcome::Success("I hope".to_string()));
/// # });
/// ```
pub fn from_declared_effect<Args, T, E>(key: impl Into<String>) -> DeclaredEffectLogic<Args, T, E> {
    DeclaredEffectLogic {
        key: key.into(),
        _types: PhantomData,
    }
}

impl<Args, T, E> DeclaredEffectLogic<Args, T, E> {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<Args, T, E> Clone for DeclaredEffectLogic<Args, T, E> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            _types: PhantomData,
        }
    }
}

impl<Args, T, E> PromiseLogic for DeclaredEffectLogic<Args, T, E>
where
    Args: Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    type Input = (Arc<Declarations>, Args);
    type Output = Outcome<T, E>;

    fn start(&self, (declarations, args): Self::Input) -> LogicFuture<Outcome<T, E>> {
        let key = self.key.clone();
        settle("declared", async move {
            let computation = declarations.lookup::<Args, T, E>(&key)?;
            let effect = computation(args);
            run_to_outcome(effect, &declarations.services).await
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::Capability;

    trait Prefix: Send + Sync {
        fn prefix(&self) -> &str;
    }

    struct Fixed(&'static str);
    impl Prefix for Fixed {
        fn prefix(&self) -> &str {
            self.0
        }
    }

    struct PrefixTag;
    impl Capability for PrefixTag {
        const NAME: &'static str = "Prefix";
        type Service = dyn Prefix;
    }

    type Greet = DeclaredEffectLogic<String, String, String>;

    fn greetings() -> Arc<Declarations> {
        let services = Context::empty().with::<PrefixTag>(Arc::new(Fixed("hello")));
        Arc::new(
            Declarations::new(services)
                .declare("greet", |name: String| {
                    from_fn(move |context: &Context| {
                        let prefix = context.get::<PrefixTag>().map_err(Cause::Die)?;
                        if name.is_empty() {
                            return Err(Cause::Fail("nobody to greet".to_string()));
                        }
                        Ok(format!("{} {name}", prefix.prefix()))
                    })
                })
                .declare("count", |(words, limit): (Vec<String>, usize)| {
                    from_fn(move |_: &Context| {
                        if words.len() > limit {
                            return Err(Cause::Fail(words.len()));
                        }
                        Ok(words.len() as u64)
                    })
                })
                .declare("panic", |_: String| {
                    from_fn(|_: &Context| -> Result<String, Cause<String>> {
                        panic!("declared panic")
                    })
                }),
        )
    }

    #[tokio::test]
    async fn selects_computation_by_key() {
        let logic: Greet = from_declared_effect("greet");

        let outcome = logic
            .start((greetings(), "world".to_string()))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Success("hello world".to_string()));
    }

    #[tokio::test]
    async fn declared_failure_resolves() {
        let logic: Greet = from_declared_effect("greet");

        let outcome = logic.start((greetings(), String::new())).await.unwrap();

        assert_eq!(outcome, Outcome::Failure("nobody to greet".to_string()));
    }

    #[tokio::test]
    async fn keys_keep_their_own_signatures() {
        let logic = from_declared_effect::<(Vec<String>, usize), u64, usize>("count");
        let words = vec!["a".to_string(), "b".to_string(), "c".to_string()];

        let counted = logic
            .start((greetings(), (words.clone(), 5)))
            .await
            .unwrap();
        let too_many = logic.start((greetings(), (words, 2))).await.unwrap();

        assert_eq!(counted, Outcome::Success(3));
        assert_eq!(too_many, Outcome::Failure(3));
    }

    #[tokio::test]
    async fn signature_mismatch_rejects() {
        let logic = from_declared_effect::<String, u64, usize>("greet");

        let result = logic.start((greetings(), "world".to_string())).await;

        assert!(matches!(
            result,
            Err(Defect::PayloadMismatch { expected }) if expected.contains("u64")
        ));
    }

    #[tokio::test]
    async fn unknown_key_rejects() {
        let logic: Greet = from_declared_effect("farewell");

        let result = logic.start((greetings(), "world".to_string())).await;

        assert!(matches!(result, Err(Defect::UnknownLogic { ref key }) if key == "farewell"));
    }

    #[tokio::test]
    async fn panicking_declaration_rejects() {
        let logic: Greet = from_declared_effect("panic");

        let result = logic.start((greetings(), "x".to_string())).await;

        assert!(matches!(result, Err(Defect::Panicked(_))));
    }

    #[test]
    fn lookup_checks_key_and_types() {
        let declarations = greetings();

        assert_eq!(declarations.keys(), vec!["count", "greet", "panic"]);
        assert!(declarations.get::<String, String, String>("greet").is_some());
        assert!(declarations.get::<String, String, usize>("greet").is_none());
        assert!(declarations.get::<String, String, String>("missing").is_none());
        assert!(declarations.services().contains::<PrefixTag>());
    }

    #[test]
    fn debug_lists_keys() {
        let rendered = format!("{:?}", greetings());

        assert!(rendered.contains("\"count\""));
        assert!(rendered.contains("Prefix"));
    }
}
