//! Property-based tests for outcomes, guards, history and the adapters.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated inputs.

use chrono::Utc;
use effect_logic::core::{Cause, Defect, Guard, Outcome, State, StateHistory, StateTransition, Trigger};
use effect_logic::layer::{Context, Layer};
use effect_logic::logic::{from_effect, from_unary, EffectInput, PromiseLogic};
use effect_logic::state_enum;
use futures::executor::block_on;
use proptest::prelude::*;
use stillwater::prelude::*;

state_enum! {
    enum TestState {
        Init,
        Ok,
        Exception,
        Error,
        Done,
    }
    final: [Done]
    error: [Error]
}

fn arbitrary_state() -> impl Strategy<Value = TestState> {
    prop::sample::select(TestState::ALL)
}

fn arbitrary_trigger() -> impl Strategy<Value = Trigger> {
    prop_oneof![
        Just(Trigger::Always),
        "[a-z]{1,8}".prop_map(|src| Trigger::Done { src }),
        "[a-z]{1,8}".prop_map(|src| Trigger::Error { src }),
    ]
}

fn history_of(path: &[TestState], triggers: &[Trigger]) -> StateHistory<TestState> {
    let mut history = StateHistory::new();
    for (pair, trigger) in path.windows(2).zip(triggers.iter().cycle()) {
        history = history.record(StateTransition {
            from: pair[0],
            to: pair[1],
            timestamp: Utc::now(),
            trigger: trigger.clone(),
        });
    }
    history
}

/// Computation whose result is fixed by its arguments.
fn settle_as(
    value: i64,
    declared: Option<String>,
    defect: Option<String>,
) -> impl stillwater::effect::Effect<Output = i64, Error = Cause<String>, Env = Context> {
    from_fn(move |_: &Context| {
        if let Some(message) = &defect {
            return Err(Cause::Die(Defect::Died(message.clone())));
        }
        match &declared {
            Some(error) => Err(Cause::Fail(error.clone())),
            None => Ok(value),
        }
    })
}

proptest! {
    #[test]
    fn outcome_tag_matches_branch(value in any::<i32>(), error in ".*") {
        let success: Outcome<i32, String> = Outcome::Success(value);
        let failure: Outcome<i32, String> = Outcome::Failure(error);

        prop_assert!(success.is_success() && !success.is_failure());
        prop_assert!(failure.is_failure() && !failure.is_success());
        prop_assert_ne!(success.tag(), failure.tag());
    }

    #[test]
    fn outcome_agrees_with_result(result in prop::result::maybe_ok(any::<u16>(), "[a-z]*")) {
        let outcome = Outcome::from(result.clone());

        prop_assert_eq!(outcome.is_success(), result.is_ok());
        prop_assert_eq!(outcome.into_result(), result);
    }

    #[test]
    fn outcome_map_leaves_failures_alone(error in "[a-z]*", offset in any::<i8>()) {
        let failure: Outcome<i8, String> = Outcome::Failure(error.clone());

        let mapped = failure.map(|n| n.wrapping_add(offset));

        prop_assert_eq!(mapped, Outcome::Failure(error));
    }

    #[test]
    fn guard_is_deterministic(state in arbitrary_state()) {
        let guard = Guard::new(|s: &TestState| !s.is_final());

        prop_assert_eq!(guard.check(&state).unwrap(), guard.check(&state).unwrap());
    }

    #[test]
    fn negated_guard_is_complement(state in arbitrary_state()) {
        let guard = Guard::new(|s: &TestState| s.is_error());
        let negated = guard.clone().not();

        prop_assert_eq!(negated.check(&state).unwrap(), !guard.check(&state).unwrap());
    }

    #[test]
    fn state_name_matches_display(state in arbitrary_state()) {
        prop_assert_eq!(state.name(), state.to_string());
    }

    #[test]
    fn history_preserves_order(
        path in prop::collection::vec(arbitrary_state(), 2..10),
        triggers in prop::collection::vec(arbitrary_trigger(), 1..4),
    ) {
        let history = history_of(&path, &triggers);

        prop_assert_eq!(history.len(), path.len() - 1);
        let recorded: Vec<TestState> = history.get_path().into_iter().copied().collect();
        prop_assert_eq!(recorded, path);
    }

    #[test]
    fn history_record_is_pure(from in arbitrary_state(), to in arbitrary_state()) {
        let history = StateHistory::new();

        let extended = history.record(StateTransition {
            from,
            to,
            timestamp: Utc::now(),
            trigger: Trigger::Always,
        });

        prop_assert!(history.is_empty());
        prop_assert_eq!(extended.len(), 1);
    }

    #[test]
    fn history_roundtrip_serialization(
        path in prop::collection::vec(arbitrary_state(), 0..6),
        triggers in prop::collection::vec(arbitrary_trigger(), 1..4),
    ) {
        let history = history_of(&path, &triggers);

        let json = serde_json::to_string(&history).unwrap();
        let restored: StateHistory<TestState> = serde_json::from_str(&json).unwrap();

        prop_assert_eq!(restored.get_path(), history.get_path());
        let restored_triggers: Vec<_> = restored.transitions().iter().map(|t| &t.trigger).collect();
        let original_triggers: Vec<_> = history.transitions().iter().map(|t| &t.trigger).collect();
        prop_assert_eq!(restored_triggers, original_triggers);
    }

    #[test]
    fn successful_effect_resolves_with_its_value(value in any::<i64>()) {
        let logic = from_effect(settle_as);

        let outcome = block_on(logic.start(EffectInput::new((value, None, None), Layer::empty())));

        prop_assert_eq!(outcome.unwrap(), Outcome::Success(value));
    }

    #[test]
    fn declared_failure_resolves_with_its_error(value in any::<i64>(), error in ".*") {
        let logic = from_effect(settle_as);

        let outcome = block_on(logic.start(EffectInput::new(
            (value, Some(error.clone()), None),
            Layer::empty(),
        )));

        prop_assert_eq!(outcome.unwrap(), Outcome::Failure(error));
    }

    #[test]
    fn defect_rejects_even_with_declared_failure(
        value in any::<i64>(),
        error in proptest::option::of(".*"),
        message in ".*",
    ) {
        let logic = from_effect(settle_as);

        let result = block_on(logic.start(EffectInput::new(
            (value, error, Some(message.clone())),
            Layer::empty(),
        )));

        prop_assert!(matches!(result, Err(Defect::Died(ref m)) if *m == message));
    }

    #[test]
    fn adapters_built_twice_agree(value in any::<i64>(), fail in any::<bool>()) {
        let first_logic = from_effect(settle_as);
        let second_logic = from_effect(settle_as);
        let input = EffectInput::new(
            (value, fail.then(|| "declared".to_string()), None),
            Layer::empty(),
        );

        let first = block_on(first_logic.start(input.clone())).unwrap();
        let second = block_on(second_logic.start(input.clone())).unwrap();
        let again = block_on(first_logic.start(input)).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(first, again);
    }

    #[test]
    fn unary_function_passes_its_argument_through(value in any::<u32>()) {
        let logic = from_unary(|n: u32| async move { Ok::<_, std::io::Error>(u64::from(n) + 1) });

        let resolved = block_on(logic.start(value)).unwrap();

        prop_assert_eq!(resolved, u64::from(value) + 1);
    }
}
