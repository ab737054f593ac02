//! Property tests: fail-closed evaluation over arbitrary flag contexts.

use golden_path_engine::GoldenPathEvaluator;
use golden_path_resolvers::ResolverRegistry;
use golden_path_types::{FlagContext, FlagMap, ModuleCode, Step, StepType};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

const FLAG_POOL: &[&str] = &[
    "property_exists",
    "listing_active",
    "dossier_complete",
    "sales_mandate_active",
    "user_authenticated",
    "bank_submitted",
    "provider_active",
    "booking_confirmed",
];

fn arb_flag_name() -> impl Strategy<Value = String> {
    prop::sample::select(FLAG_POOL).prop_map(str::to_string)
}

/// Arbitrary flag map over the pool, including absent keys.
fn arb_flags() -> impl Strategy<Value = FlagMap> {
    prop::collection::hash_map(arb_flag_name(), any::<bool>(), 0..5)
}

fn arb_step_type() -> impl Strategy<Value = StepType> {
    prop_oneof![
        Just(StepType::Route),
        Just(StepType::Action),
        Just(StepType::WaitMessage),
        Just(StepType::System),
    ]
}

fn arb_step(min_pre: usize, max_pre: usize, max_done: usize) -> impl Strategy<Value = Step> {
    (
        arb_step_type(),
        prop::collection::vec(arb_flag_name(), min_pre..max_pre),
        prop::collection::vec(arb_flag_name(), 0..max_done),
    )
        .prop_map(|(step_type, pre, done)| {
            let mut step = Step::new("s", step_type);
            for key in pre {
                let description = format!("{} required", key);
                step = step.requires(key, description);
            }
            for key in done {
                let description = format!("{} done", key);
                step = step.completes_when(key, description);
            }
            step
        })
}

/// A context B and a superset context A (every true flag of B is true in A).
fn arb_context_pair() -> impl Strategy<Value = (FlagContext, FlagContext)> {
    (arb_flags(), arb_flags()).prop_map(|(base, extra)| {
        let smaller = FlagContext::from_flags(base.clone());
        let mut larger = base;
        for (key, value) in extra {
            if value {
                larger.insert(key, true);
            }
        }
        (FlagContext::from_flags(larger), smaller)
    })
}

fn unregistered_context() -> FlagContext {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    runtime
        .block_on(ResolverRegistry::new().resolve(&ModuleCode::new("MOD-99"), None, None))
        .context
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// A step without preconditions can always be entered.
    #[test]
    fn no_preconditions_always_enterable(
        step in arb_step(0, 1, 4),
        flags in arb_flags(),
    ) {
        let evaluator = GoldenPathEvaluator::default();
        prop_assert!(evaluator.evaluate_step(&step, &FlagContext::new()).can_enter);
        prop_assert!(evaluator.evaluate_step(&step, &FlagContext::from_flags(flags)).can_enter);
    }

    /// Turning more flags on never blocks a step that was enterable.
    #[test]
    fn enterability_is_monotone(
        steps in prop::collection::vec(arb_step(0, 5, 3), 1..6),
        (larger, smaller) in arb_context_pair(),
    ) {
        let evaluator = GoldenPathEvaluator::default();
        for step in &steps {
            if evaluator.evaluate_step(step, &smaller).can_enter {
                prop_assert!(evaluator.evaluate_step(step, &larger).can_enter);
            }
        }
    }

    /// A step with no completion criteria is never complete.
    #[test]
    fn no_completion_never_complete(
        step in arb_step(0, 4, 1),
        flags in arb_flags(),
    ) {
        let evaluator = GoldenPathEvaluator::default();
        let mut all_true = FlagMap::new();
        for name in FLAG_POOL {
            all_true.insert((*name).to_string(), true);
        }

        prop_assert!(!evaluator.evaluate_step(&step, &FlagContext::from_flags(flags)).is_complete);
        prop_assert!(!evaluator.evaluate_step(&step, &FlagContext::from_flags(all_true)).is_complete);
    }

    /// Without a resolver every gated step is blocked.
    #[test]
    fn missing_resolver_fails_closed(step in arb_step(1, 5, 3)) {
        let evaluator = GoldenPathEvaluator::default();
        let ctx = unregistered_context();
        prop_assert!(ctx.is_empty());
        prop_assert!(!evaluator.evaluate_step(&step, &ctx).can_enter);
    }
}
