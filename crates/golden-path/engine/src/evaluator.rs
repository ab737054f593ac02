//! Evaluator: pure verdicts over `(definition, context)`
//!
//! Nothing here performs I/O or holds state. Every call recomputes its
//! answer from the definition and a fully-resolved [`FlagContext`]; a
//! missing flag is simply `false`.

use golden_path_types::{
    ActionDecision, FlagContext, GoldenPathDefinition, RouteDecision, Step, StepEvaluation,
};

use crate::config::EngineConfig;

/// Evaluates Golden Path definitions against flag contexts
#[derive(Clone, Debug)]
pub struct GoldenPathEvaluator {
    default_route: String,
}

impl Default for GoldenPathEvaluator {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl GoldenPathEvaluator {
    pub fn new(default_route: impl Into<String>) -> Self {
        Self {
            default_route: default_route.into(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.default_route.clone())
    }

    pub fn default_route(&self) -> &str {
        &self.default_route
    }

    /// Evaluate one step.
    ///
    /// Enterable iff every precondition holds (vacuously true when there are
    /// none). Complete iff there is at least one completion criterion and all
    /// of them hold.
    pub fn evaluate_step<'a>(&self, step: &'a Step, ctx: &FlagContext) -> StepEvaluation<'a> {
        let failed_preconditions: Vec<_> = step
            .preconditions
            .iter()
            .filter(|p| !ctx.flag(&p.key))
            .collect();
        let failed_completions: Vec<_> = step
            .completion
            .iter()
            .filter(|c| !ctx.flag(&c.key))
            .collect();

        StepEvaluation {
            step,
            can_enter: failed_preconditions.is_empty(),
            is_complete: !step.completion.is_empty() && failed_completions.is_empty(),
            failed_preconditions,
            failed_completions,
        }
    }

    /// Evaluate every step in declared order
    pub fn evaluate_golden_path<'a>(
        &self,
        def: &'a GoldenPathDefinition,
        ctx: &FlagContext,
    ) -> Vec<StepEvaluation<'a>> {
        def.steps
            .iter()
            .map(|step| self.evaluate_step(step, ctx))
            .collect()
    }

    /// Route guard decision.
    ///
    /// Routes no step claims are ungated. A blocked route redirects to the
    /// deepest enterable checkpoint other than itself, falling back to the
    /// definition's `failure_redirect` and then to the default route.
    pub fn can_enter_route(
        &self,
        def: &GoldenPathDefinition,
        route_pattern: &str,
        ctx: &FlagContext,
    ) -> RouteDecision {
        let Some(step) = def.step_for_route(route_pattern) else {
            return RouteDecision::Allowed;
        };

        let evaluation = self.evaluate_step(step, ctx);
        if evaluation.can_enter {
            return RouteDecision::Allowed;
        }

        // Candidates are checked for enterability only, not completion.
        let target = def
            .steps
            .iter()
            .rev()
            .filter(|s| s.is_checkpoint())
            .filter(|s| s.route_pattern.as_deref() != Some(route_pattern))
            .find(|s| self.evaluate_step(s, ctx).can_enter)
            .and_then(|s| s.route_pattern.clone())
            .unwrap_or_else(|| self.fallback_route(def).to_string());

        RouteDecision::Redirect {
            target,
            reason: evaluation.blocked_reason(),
        }
    }

    /// Action guard decision, keyed by step id. Unknown ids are allowed.
    pub fn can_run_action(
        &self,
        def: &GoldenPathDefinition,
        action_id: &str,
        ctx: &FlagContext,
    ) -> ActionDecision {
        let Some(step) = def.steps.iter().find(|s| s.id.as_str() == action_id) else {
            return ActionDecision::Allowed;
        };

        let evaluation = self.evaluate_step(step, ctx);
        if evaluation.can_enter {
            ActionDecision::Allowed
        } else {
            ActionDecision::Blocked {
                reason: evaluation.blocked_reason(),
            }
        }
    }

    /// First step, in order, that is enterable but not complete
    pub fn next_step<'a>(&self, def: &'a GoldenPathDefinition, ctx: &FlagContext) -> Option<&'a Step> {
        def.steps
            .iter()
            .find(|step| self.evaluate_step(step, ctx).is_actionable())
    }

    /// Whole-workflow success. Needs a declared, non-empty success state.
    pub fn is_completed(&self, def: &GoldenPathDefinition, ctx: &FlagContext) -> bool {
        def.success_state.as_ref().is_some_and(|success| {
            !success.required_flags.is_empty()
                && success.required_flags.iter().all(|flag| ctx.flag(flag))
        })
    }

    fn fallback_route<'a>(&'a self, def: &'a GoldenPathDefinition) -> &'a str {
        def.failure_redirect.as_deref().unwrap_or(&self.default_route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use golden_path_types::SuccessState;

    fn make_definition() -> GoldenPathDefinition {
        GoldenPathDefinition::new("MOD-04")
            .with_step(
                Step::action("create_property")
                    .at_route("/portal/immobilien/portfolio")
                    .completes_when("property_exists", "Property created"),
            )
            .unwrap()
            .with_step(
                Step::route("edit_dossier", "/portal/immobilien/:id")
                    .requires("property_exists", "Property must exist"),
            )
            .unwrap()
            .with_step(
                Step::action("activate_sales_mandate")
                    .requires("property_exists", "Property must exist")
                    .requires("dossier_complete", "Dossier must be complete"),
            )
            .unwrap()
            .with_step(
                Step::route("sales_desk", "/admin/sales-desk")
                    .requires("sales_mandate_active", "Sales mandate must be active"),
            )
            .unwrap()
    }

    #[test]
    fn test_failed_lists() {
        let def = make_definition();
        let evaluator = GoldenPathEvaluator::default();
        let ctx = FlagContext::new().with_flag("property_exists", true);

        let eval = evaluator.evaluate_step(&def.steps[2], &ctx);
        assert!(!eval.can_enter);
        assert_eq!(eval.failed_preconditions.len(), 1);
        assert_eq!(eval.failed_preconditions[0].key, "dossier_complete");
    }

    #[test]
    fn test_blocked_route_redirects_to_deepest_checkpoint() {
        let def = make_definition();
        let evaluator = GoldenPathEvaluator::default();
        let ctx = FlagContext::new().with_flag("property_exists", true);

        let decision = evaluator.can_enter_route(&def, "/admin/sales-desk", &ctx);
        assert_eq!(
            decision,
            RouteDecision::Redirect {
                target: "/portal/immobilien/:id".into(),
                reason: "Sales mandate must be active".into(),
            }
        );
    }

    #[test]
    fn test_action_without_route_is_not_a_checkpoint() {
        let def = make_definition();
        let evaluator = GoldenPathEvaluator::default();
        let ctx = FlagContext::new()
            .with_flag("property_exists", true)
            .with_flag("dossier_complete", true);

        // activate_sales_mandate is enterable but has no route
        let decision = evaluator.can_enter_route(&def, "/admin/sales-desk", &ctx);
        assert!(matches!(
            decision,
            RouteDecision::Redirect { ref target, .. } if target == "/portal/immobilien/:id"
        ));
    }

    #[test]
    fn test_fallback_route() {
        let def = GoldenPathDefinition::new("GP-X")
            .with_step(Step::route("only", "/portal/x").requires("a", "A required"))
            .unwrap();
        let evaluator = GoldenPathEvaluator::new("/portal");

        let decision = evaluator.can_enter_route(&def, "/portal/x", &FlagContext::new());
        assert!(matches!(decision, RouteDecision::Redirect { ref target, .. } if target == "/portal"));

        let def = def.with_failure_redirect("/portal/dashboard");
        let decision = evaluator.can_enter_route(&def, "/portal/x", &FlagContext::new());
        assert!(
            matches!(decision, RouteDecision::Redirect { ref target, .. } if target == "/portal/dashboard")
        );
    }

    #[test]
    fn test_can_run_action() {
        let def = make_definition();
        let evaluator = GoldenPathEvaluator::default();

        let decision = evaluator.can_run_action(&def, "activate_sales_mandate", &FlagContext::new());
        assert_eq!(
            decision,
            ActionDecision::Blocked {
                reason: "Property must exist, Dossier must be complete".into()
            }
        );
        assert!(evaluator
            .can_run_action(&def, "unknown_action", &FlagContext::new())
            .is_allowed());
    }

    #[test]
    fn test_is_completed() {
        let evaluator = GoldenPathEvaluator::default();
        let def = make_definition();
        let ctx = FlagContext::new().with_flag("sales_mandate_active", true);
        assert!(!evaluator.is_completed(&def, &ctx));

        let def = def.with_success_state(SuccessState::new(["sales_mandate_active"]));
        assert!(evaluator.is_completed(&def, &ctx));
        assert!(!evaluator.is_completed(&def, &FlagContext::new()));

        let empty = make_definition().with_success_state(SuccessState::new(Vec::<String>::new()));
        assert!(!evaluator.is_completed(&empty, &ctx));
    }
}
