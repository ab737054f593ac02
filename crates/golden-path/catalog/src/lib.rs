//! Built-in Golden Paths
//!
//! Four workflows ship with the platform:
//!
//! - `MOD-04`: a property from creation through sales mandate, downstream
//!   visibility, and withdrawal
//! - `GP-FINANCE-Z3`: a financing request from a Zone 3 website through Z1
//!   triage and manager assignment to the bank
//! - `GP-PET`: a pet manager customer from lead capture to the first booking
//! - `GP-MANAGER-LIFECYCLE`: a manager application through Z1 verification
//!   and activation to the first assigned client
//!
//! Each comes with its resolver over the [`DomainStore`] port. The ledger
//! event whitelist and the route manifest cover all of them, so the catalog
//! audits clean.
//!
//! [`DomainStore`]: golden_path_resolvers::DomainStore

#![deny(unsafe_code)]

pub mod definitions;
pub mod manifest;
pub mod resolvers;
pub mod whitelist;

use std::sync::Arc;

use golden_path_engine::{
    ContextCache, DefinitionRegistry, EngineConfig, GoldenPathEvaluator, RouteGuard,
};
use golden_path_resolvers::{DomainStore, ResolverRegistry};
use golden_path_types::GoldenPathResult;

pub use manifest::bundled_manifest;
pub use resolvers::{
    register_resolvers, FinanceZ3Resolver, ManagerLifecycleResolver, PetResolver, PropertyResolver,
};
pub use whitelist::{is_whitelisted, LEDGER_EVENT_WHITELIST};

/// Register every built-in definition
pub fn register_definitions(registry: &mut DefinitionRegistry) -> GoldenPathResult<()> {
    for definition in definitions::builtin()? {
        registry.register(definition)?;
    }
    Ok(())
}

/// Wire the built-in definitions and resolvers into a route guard
pub fn build_guard(store: Arc<dyn DomainStore>, config: &EngineConfig) -> GoldenPathResult<RouteGuard> {
    let mut definitions = DefinitionRegistry::new();
    register_definitions(&mut definitions)?;

    let mut resolvers = ResolverRegistry::new();
    register_resolvers(&mut resolvers, store)?;

    tracing::info!(
        definitions = definitions.count(),
        resolvers = resolvers.count(),
        "Golden path catalog loaded"
    );

    Ok(RouteGuard::new(
        Arc::new(definitions),
        ContextCache::from_config(Arc::new(resolvers), config),
        GoldenPathEvaluator::from_config(config),
    ))
}
