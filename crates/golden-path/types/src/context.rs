//! Flag contexts: the boolean snapshot a Golden Path is evaluated against
//!
//! A context is built fresh by a resolver for every evaluation and is never
//! mutated afterwards. Lookups are fail-closed: an unknown flag reads as
//! `false`, exactly like a flag that was resolved to `false`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Named boolean facts produced by a resolver
pub type FlagMap = HashMap<String, bool>;

// ── Identifiers ──────────────────────────────────────────────────────

/// Tenant (organisation) scope of a workflow instance
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TenantId(pub String);

impl TenantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The domain record a workflow instance is about (a property, a request, ...)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Flag Context ─────────────────────────────────────────────────────

/// Snapshot of the flags of one workflow instance
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagContext {
    /// Tenant the flags were resolved for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<TenantId>,
    /// Entity the flags were resolved for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<EntityId>,
    #[serde(default)]
    flags: FlagMap,
}

impl FlagContext {
    /// An empty context: every flag reads as `false`
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_flags(flags: FlagMap) -> Self {
        Self {
            tenant_id: None,
            entity_id: None,
            flags,
        }
    }

    pub fn with_tenant(mut self, tenant_id: Option<TenantId>) -> Self {
        self.tenant_id = tenant_id;
        self
    }

    pub fn with_entity(mut self, entity_id: Option<EntityId>) -> Self {
        self.entity_id = entity_id;
        self
    }

    pub fn with_flag(mut self, key: impl Into<String>, value: bool) -> Self {
        self.flags.insert(key.into(), value);
        self
    }

    /// Fail-closed lookup. Absent keys are `false`.
    pub fn flag(&self, key: &str) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    /// Raw flag map, as resolved
    pub fn flags(&self) -> &FlagMap {
        &self.flags
    }

    /// Names of all flags that are currently `true`
    pub fn true_flags(&self) -> impl Iterator<Item = &str> {
        self.flags
            .iter()
            .filter(|(_, value)| **value)
            .map(|(key, _)| key.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}
