//! Context cache: time-based read-through cache of resolved contexts
//!
//! Keyed by `(module, entity, tenant)`. An entry younger than the staleness
//! window is reused without calling the resolver; an older one is resolved
//! again. Entries keep the resolution diagnostic, so a hit still reports a
//! missing resolver. The cache is not size-bounded.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use golden_path_resolvers::{Resolution, ResolverRegistry};
use golden_path_types::{EntityId, ModuleCode, TenantId};
use tokio::time::Instant;

use crate::config::EngineConfig;

/// Identity of one cached context
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub module_code: ModuleCode,
    pub entity_id: Option<EntityId>,
    pub tenant_id: Option<TenantId>,
}

impl CacheKey {
    pub fn new(
        module_code: ModuleCode,
        entity_id: Option<EntityId>,
        tenant_id: Option<TenantId>,
    ) -> Self {
        Self {
            module_code,
            entity_id,
            tenant_id,
        }
    }
}

#[derive(Clone, Debug)]
struct CachedContext {
    resolution: Resolution,
    resolved_at: Instant,
}

/// Read-through cache in front of a [`ResolverRegistry`]
#[derive(Clone)]
pub struct ContextCache {
    resolvers: Arc<ResolverRegistry>,
    staleness: Duration,
    entries: Arc<DashMap<CacheKey, CachedContext>>,
}

impl ContextCache {
    pub fn new(resolvers: Arc<ResolverRegistry>, staleness: Duration) -> Self {
        Self {
            resolvers,
            staleness,
            entries: Arc::new(DashMap::new()),
        }
    }

    pub fn from_config(resolvers: Arc<ResolverRegistry>, config: &EngineConfig) -> Self {
        Self::new(resolvers, config.staleness())
    }

    pub fn resolvers(&self) -> &ResolverRegistry {
        &self.resolvers
    }

    pub fn staleness(&self) -> Duration {
        self.staleness
    }

    /// Cached resolution if fresh, otherwise a newly resolved one
    pub async fn get_or_resolve(&self, key: &CacheKey) -> Resolution {
        if let Some(resolution) = self.fresh(key) {
            return resolution;
        }

        let resolution = self
            .resolvers
            .resolve(
                &key.module_code,
                key.tenant_id.as_ref(),
                key.entity_id.as_ref(),
            )
            .await;

        self.entries.insert(
            key.clone(),
            CachedContext {
                resolution: resolution.clone(),
                resolved_at: Instant::now(),
            },
        );
        resolution
    }

    fn fresh(&self, key: &CacheKey) -> Option<Resolution> {
        let entry = self.entries.get(key)?;
        if entry.resolved_at.elapsed() < self.staleness {
            tracing::trace!(module_code = %key.module_code, "Context cache hit");
            Some(entry.resolution.clone())
        } else {
            None
        }
    }

    /// Drop one entry. Returns whether it was cached.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Drop every entry of a module
    pub fn invalidate_module(&self, module_code: &ModuleCode) {
        self.entries.retain(|key, _| &key.module_code != module_code);
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ContextCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextCache")
            .field("staleness", &self.staleness)
            .field("entries", &self.entries.len())
            .finish()
    }
}
