//! The resolver seam
//!
//! Each business module plugs in one [`ContextResolver`]. Implementations
//! fan out to a handful of store lookups, join them, and fold the results
//! into named booleans.

use async_trait::async_trait;
use golden_path_types::{EntityId, FlagMap, TenantId};
use std::future::Future;

/// Computes the flag map of one module for one workflow instance.
///
/// Must be total: return a complete map even when lookups fail.
#[async_trait]
pub trait ContextResolver: Send + Sync {
    async fn resolve(&self, tenant_id: Option<&TenantId>, entity_id: Option<&EntityId>) -> FlagMap;
}

/// Adapts an async closure into a [`ContextResolver`]
pub struct FnResolver<F> {
    func: F,
}

/// Wrap `func` as a resolver. The closure receives owned identifiers.
pub fn resolver_fn<F, Fut>(func: F) -> FnResolver<F>
where
    F: Fn(Option<TenantId>, Option<EntityId>) -> Fut + Send + Sync,
    Fut: Future<Output = FlagMap> + Send,
{
    FnResolver { func }
}

#[async_trait]
impl<F, Fut> ContextResolver for FnResolver<F>
where
    F: Fn(Option<TenantId>, Option<EntityId>) -> Fut + Send + Sync,
    Fut: Future<Output = FlagMap> + Send,
{
    async fn resolve(&self, tenant_id: Option<&TenantId>, entity_id: Option<&EntityId>) -> FlagMap {
        (self.func)(tenant_id.cloned(), entity_id.cloned()).await
    }
}
