//! Built-in context resolvers
//!
//! One resolver per built-in definition, each reading through the shared
//! [`DomainStore`] port.

use std::sync::Arc;

use golden_path_resolvers::{DomainStore, ResolverRegistry, StoreResult};
use golden_path_types::GoldenPathResult;

pub mod finance_z3;
pub mod manager_lifecycle;
pub mod mod_04;
pub mod pet;

pub use finance_z3::FinanceZ3Resolver;
pub use manager_lifecycle::ManagerLifecycleResolver;
pub use mod_04::PropertyResolver;
pub use pet::PetResolver;

/// Register the resolver of every built-in definition
pub fn register_resolvers(
    registry: &mut ResolverRegistry,
    store: Arc<dyn DomainStore>,
) -> GoldenPathResult<()> {
    registry.register(
        crate::definitions::mod_04::MODULE_CODE,
        PropertyResolver::new(store.clone()),
    )?;
    registry.register(
        crate::definitions::finance_z3::MODULE_CODE,
        FinanceZ3Resolver::new(store.clone()),
    )?;
    registry.register(crate::definitions::pet::MODULE_CODE, PetResolver::new(store.clone()))?;
    registry.register(
        crate::definitions::manager_lifecycle::MODULE_CODE,
        ManagerLifecycleResolver::new(store),
    )?;
    Ok(())
}

/// The status is one of `accepted`
fn status_in(status: Option<&str>, accepted: &[&str]) -> bool {
    status.is_some_and(|s| accepted.contains(&s))
}

/// Both lookups succeeded and hold
fn both(a: &StoreResult<bool>, b: &StoreResult<bool>) -> bool {
    matches!((a, b), (Ok(true), Ok(true)))
}
