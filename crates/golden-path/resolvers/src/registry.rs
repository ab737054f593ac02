//! Resolver registry: module code → context resolver
//!
//! The registry is built once at startup and then shared read-only. A
//! module without a resolver resolves to an empty context, which makes
//! every precondition of that module unmet.

use std::collections::HashMap;
use std::sync::Arc;

use golden_path_types::{
    EntityId, FlagContext, GoldenPathError, GoldenPathResult, ModuleCode, TenantId,
};

use serde::Serialize;

use crate::resolver::ContextResolver;

/// Non-fatal note attached to a resolution
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionDiagnostic {
    /// No resolver is registered; the context is empty
    ResolverMissing { module_code: ModuleCode },
}

/// A resolved context plus any diagnostic raised while resolving it
#[derive(Clone, Debug)]
pub struct Resolution {
    pub context: FlagContext,
    pub diagnostic: Option<ResolutionDiagnostic>,
}

/// Registry of context resolvers
#[derive(Clone, Default)]
pub struct ResolverRegistry {
    resolvers: HashMap<ModuleCode, Arc<dyn ContextResolver>>,
}

impl ResolverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the resolver of a module. A second registration is rejected.
    pub fn register(
        &mut self,
        module_code: impl Into<ModuleCode>,
        resolver: impl ContextResolver + 'static,
    ) -> GoldenPathResult<()> {
        self.register_arc(module_code.into(), Arc::new(resolver))
    }

    pub fn register_arc(
        &mut self,
        module_code: ModuleCode,
        resolver: Arc<dyn ContextResolver>,
    ) -> GoldenPathResult<()> {
        if self.resolvers.contains_key(&module_code) {
            return Err(GoldenPathError::DuplicateResolver(module_code));
        }
        tracing::info!(module_code = %module_code, "Context resolver registered");
        self.resolvers.insert(module_code, resolver);
        Ok(())
    }

    /// Explicitly override a resolver, returning the previous one
    pub fn replace(
        &mut self,
        module_code: impl Into<ModuleCode>,
        resolver: impl ContextResolver + 'static,
    ) -> Option<Arc<dyn ContextResolver>> {
        let module_code = module_code.into();
        tracing::info!(module_code = %module_code, "Context resolver replaced");
        self.resolvers.insert(module_code, Arc::new(resolver))
    }

    pub fn get(&self, module_code: &ModuleCode) -> Option<Arc<dyn ContextResolver>> {
        self.resolvers.get(module_code).cloned()
    }

    pub fn contains(&self, module_code: &ModuleCode) -> bool {
        self.resolvers.contains_key(module_code)
    }

    pub fn count(&self) -> usize {
        self.resolvers.len()
    }

    pub fn module_codes(&self) -> Vec<&ModuleCode> {
        let mut codes: Vec<_> = self.resolvers.keys().collect();
        codes.sort();
        codes
    }

    /// Resolve a fresh context for one workflow instance
    pub async fn resolve(
        &self,
        module_code: &ModuleCode,
        tenant_id: Option<&TenantId>,
        entity_id: Option<&EntityId>,
    ) -> Resolution {
        let Some(resolver) = self.get(module_code) else {
            tracing::warn!(
                module_code = %module_code,
                "No context resolver registered, all preconditions unmet"
            );
            return Resolution {
                context: FlagContext::new()
                    .with_tenant(tenant_id.cloned())
                    .with_entity(entity_id.cloned()),
                diagnostic: Some(ResolutionDiagnostic::ResolverMissing {
                    module_code: module_code.clone(),
                }),
            };
        };

        let flags = resolver.resolve(tenant_id, entity_id).await;
        tracing::debug!(module_code = %module_code, flags = flags.len(), "Context resolved");

        Resolution {
            context: FlagContext::from_flags(flags)
                .with_tenant(tenant_id.cloned())
                .with_entity(entity_id.cloned()),
            diagnostic: None,
        }
    }
}

impl std::fmt::Debug for ResolverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverRegistry")
            .field("modules", &self.module_codes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolver_fn;
    use golden_path_types::FlagMap;

    fn constant(flag: &'static str) -> impl ContextResolver {
        resolver_fn(move |_, _| async move {
            let mut flags = FlagMap::new();
            flags.insert(flag.to_string(), true);
            flags
        })
    }

    #[tokio::test]
    async fn test_register_and_resolve() {
        let mut registry = ResolverRegistry::new();
        registry.register("MOD-04", constant("property_exists")).unwrap();

        let tenant = TenantId::new("t-1");
        let resolution = registry
            .resolve(&ModuleCode::new("MOD-04"), Some(&tenant), None)
            .await;

        assert!(resolution.diagnostic.is_none());
        assert!(resolution.context.flag("property_exists"));
        assert_eq!(resolution.context.tenant_id, Some(tenant));
    }

    #[tokio::test]
    async fn test_missing_resolver_is_empty_with_diagnostic() {
        let registry = ResolverRegistry::new();
        let resolution = registry.resolve(&ModuleCode::new("MOD-99"), None, None).await;

        assert!(resolution.context.is_empty());
        assert_eq!(
            resolution.diagnostic,
            Some(ResolutionDiagnostic::ResolverMissing {
                module_code: ModuleCode::new("MOD-99")
            })
        );
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = ResolverRegistry::new();
        registry.register("MOD-04", constant("a")).unwrap();
        let result = registry.register("MOD-04", constant("b"));
        assert!(matches!(result, Err(GoldenPathError::DuplicateResolver(_))));
        assert_eq!(registry.count(), 1);
    }

    #[tokio::test]
    async fn test_replace_overrides() {
        let mut registry = ResolverRegistry::new();
        registry.register("MOD-04", constant("a")).unwrap();
        let previous = registry.replace("MOD-04", constant("b"));
        assert!(previous.is_some());

        let resolution = registry.resolve(&ModuleCode::new("MOD-04"), None, None).await;
        assert!(resolution.context.flag("b"));
        assert!(!resolution.context.flag("a"));
    }
}
