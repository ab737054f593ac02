//! Route guard: wires resolvers and the evaluator into render decisions
//!
//! The guard resolves (or reuses) the context of the requested workflow
//! instance, injects the authentication flag, and turns the evaluator's
//! verdict into what the rendering layer needs: render the protected
//! content, or redirect with a user-facing message.

use std::sync::Arc;

use golden_path_resolvers::Resolution;
use golden_path_types::{
    ActionDecision, EntityId, FlagContext, ModuleCode, RouteDecision, TenantId,
};
use serde::Serialize;

use crate::cache::{CacheKey, ContextCache};
use crate::definition_registry::DefinitionRegistry;
use crate::evaluator::GoldenPathEvaluator;

/// Flag carrying the caller's authentication state
pub const AUTHENTICATED_FLAG: &str = "user_authenticated";

/// The workflow instance a guarded route or action belongs to
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardRequest {
    pub module_code: ModuleCode,
    pub tenant_id: Option<TenantId>,
    pub entity_id: Option<EntityId>,
    pub authenticated: bool,
}

impl GuardRequest {
    pub fn new(module_code: impl Into<ModuleCode>) -> Self {
        Self {
            module_code: module_code.into(),
            tenant_id: None,
            entity_id: None,
            authenticated: false,
        }
    }

    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(TenantId::new(tenant_id));
        self
    }

    pub fn with_entity(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(EntityId::new(entity_id));
        self
    }

    pub fn authenticated(mut self, authenticated: bool) -> Self {
        self.authenticated = authenticated;
        self
    }

    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(
            self.module_code.clone(),
            self.entity_id.clone(),
            self.tenant_id.clone(),
        )
    }
}

/// What the rendering layer should do with a route
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GuardOutcome {
    Render,
    Redirect { to: String, message: String },
}

impl GuardOutcome {
    pub fn is_render(&self) -> bool {
        matches!(self, Self::Render)
    }
}

/// Whether an action control should be enabled
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ActionOutcome {
    Allowed,
    Blocked { message: String },
}

impl ActionOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Route and action guard
#[derive(Clone, Debug)]
pub struct RouteGuard {
    definitions: Arc<DefinitionRegistry>,
    cache: ContextCache,
    evaluator: GoldenPathEvaluator,
}

impl RouteGuard {
    pub fn new(
        definitions: Arc<DefinitionRegistry>,
        cache: ContextCache,
        evaluator: GoldenPathEvaluator,
    ) -> Self {
        Self {
            definitions,
            cache,
            evaluator,
        }
    }

    pub fn definitions(&self) -> &DefinitionRegistry {
        &self.definitions
    }

    pub fn cache(&self) -> &ContextCache {
        &self.cache
    }

    pub fn evaluator(&self) -> &GoldenPathEvaluator {
        &self.evaluator
    }

    /// Resolution of the request's workflow instance, authentication included
    pub async fn resolve(&self, request: &GuardRequest) -> Resolution {
        let mut resolution = self.cache.get_or_resolve(&request.cache_key()).await;
        resolution.context = resolution
            .context
            .with_flag(AUTHENTICATED_FLAG, request.authenticated);
        resolution
    }

    /// Context of the request's workflow instance, authentication included
    pub async fn context(&self, request: &GuardRequest) -> FlagContext {
        self.resolve(request).await.context
    }

    /// Decide whether `route_pattern` may be rendered
    pub async fn check_route(&self, request: &GuardRequest, route_pattern: &str) -> GuardOutcome {
        let Some(def) = self.definitions.find(&request.module_code) else {
            return GuardOutcome::Render;
        };

        let ctx = self.context(request).await;
        match self.evaluator.can_enter_route(&def, route_pattern, &ctx) {
            RouteDecision::Allowed => GuardOutcome::Render,
            RouteDecision::Redirect { target, reason } => {
                tracing::debug!(
                    module_code = %request.module_code,
                    route = route_pattern,
                    redirect = %target,
                    "Route entry denied"
                );
                GuardOutcome::Redirect {
                    to: target,
                    message: reason,
                }
            }
        }
    }

    /// Decide whether the action `action_id` may run
    pub async fn check_action(&self, request: &GuardRequest, action_id: &str) -> ActionOutcome {
        let Some(def) = self.definitions.find(&request.module_code) else {
            return ActionOutcome::Allowed;
        };

        let ctx = self.context(request).await;
        match self.evaluator.can_run_action(&def, action_id, &ctx) {
            ActionDecision::Allowed => ActionOutcome::Allowed,
            ActionDecision::Blocked { reason } => {
                tracing::debug!(
                    module_code = %request.module_code,
                    action = action_id,
                    "Action denied"
                );
                ActionOutcome::Blocked { message: reason }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use golden_path_resolvers::{resolver_fn, ResolverRegistry};
    use golden_path_types::{FlagMap, GoldenPathDefinition, Step};
    use std::time::Duration;

    fn make_guard(flags: &[(&'static str, bool)]) -> RouteGuard {
        let mut definitions = DefinitionRegistry::new();
        definitions
            .register(
                GoldenPathDefinition::new("MOD-04")
                    .with_step(
                        Step::route("portfolio", "/portal/immobilien/portfolio")
                            .requires(AUTHENTICATED_FLAG, "Please sign in"),
                    )
                    .unwrap()
                    .with_step(
                        Step::route("dossier", "/portal/immobilien/:id")
                            .requires(AUTHENTICATED_FLAG, "Please sign in")
                            .requires("property_exists", "Property must exist"),
                    )
                    .unwrap()
                    .with_step(
                        Step::action("activate_sales_mandate")
                            .requires("dossier_complete", "Dossier must be complete"),
                    )
                    .unwrap(),
            )
            .unwrap();

        let flags: FlagMap = flags.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        let mut resolvers = ResolverRegistry::new();
        resolvers
            .register(
                "MOD-04",
                resolver_fn(move |_, _| {
                    let flags = flags.clone();
                    async move { flags }
                }),
            )
            .unwrap();

        RouteGuard::new(
            Arc::new(definitions),
            ContextCache::new(Arc::new(resolvers), Duration::from_secs(30)),
            GoldenPathEvaluator::new("/portal"),
        )
    }

    #[tokio::test]
    async fn test_authentication_flag_is_injected() {
        let guard = make_guard(&[("property_exists", true)]);
        let request = GuardRequest::new("MOD-04").with_entity("p-1");

        let outcome = guard.check_route(&request, "/portal/immobilien/:id").await;
        assert_eq!(
            outcome,
            GuardOutcome::Redirect {
                to: "/portal".into(),
                message: "Please sign in".into(),
            }
        );

        let outcome = guard
            .check_route(&request.clone().authenticated(true), "/portal/immobilien/:id")
            .await;
        assert!(outcome.is_render());
    }

    #[tokio::test]
    async fn test_redirect_to_reachable_checkpoint() {
        let guard = make_guard(&[]);
        let request = GuardRequest::new("MOD-04").authenticated(true);

        let outcome = guard.check_route(&request, "/portal/immobilien/:id").await;
        assert_eq!(
            outcome,
            GuardOutcome::Redirect {
                to: "/portal/immobilien/portfolio".into(),
                message: "Property must exist".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_unregistered_module_is_ungated() {
        let guard = make_guard(&[]);
        let request = GuardRequest::new("MOD-99");
        assert!(guard.check_route(&request, "/anything").await.is_render());
        assert!(guard.check_action(&request, "anything").await.is_allowed());
    }

    #[tokio::test]
    async fn test_check_action() {
        let guard = make_guard(&[("dossier_complete", false)]);
        let request = GuardRequest::new("MOD-04").authenticated(true);

        assert_eq!(
            guard.check_action(&request, "activate_sales_mandate").await,
            ActionOutcome::Blocked {
                message: "Dossier must be complete".into()
            }
        );
    }
}
