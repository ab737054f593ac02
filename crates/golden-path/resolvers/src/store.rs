//! Read-only port onto the domain store
//!
//! The schema is module-owned. Resolvers only ever ask three kinds of
//! question: does a matching row exist, how many are there, and what is the
//! value of one column.

use async_trait::async_trait;
use golden_path_types::{EntityId, TenantId};
use serde_json::Value;
use thiserror::Error;

/// Errors raised by a store lookup
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The query was rejected
    #[error("query failed on {table}: {reason}")]
    Query { table: String, reason: String },
}

/// Result type for store lookups
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// A single filter condition
#[derive(Clone, Debug, PartialEq)]
pub enum Condition {
    /// Column equals the value
    Eq(String, Value),
    /// Column is present and not null
    NotNull(String),
}

/// Conjunction of conditions selecting rows of one table
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordFilter {
    pub conditions: Vec<Condition>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Eq(column.into(), value.into()));
        self
    }

    pub fn not_null(mut self, column: impl Into<String>) -> Self {
        self.conditions.push(Condition::NotNull(column.into()));
        self
    }

    /// Scope to a tenant when one is known
    pub fn tenant(self, tenant_id: Option<&TenantId>) -> Self {
        match tenant_id {
            Some(tenant) => self.eq("tenant_id", tenant.as_str()),
            None => self,
        }
    }

    /// Select by primary key
    pub fn by_id(entity_id: &EntityId) -> Self {
        Self::new().eq("id", entity_id.as_str())
    }
}

/// Read-only domain store
#[async_trait]
pub trait DomainStore: Send + Sync {
    /// At least one row of `table` matches
    async fn exists(&self, table: &str, filter: &RecordFilter) -> StoreResult<bool>;

    /// Number of matching rows
    async fn count(&self, table: &str, filter: &RecordFilter) -> StoreResult<u64>;

    /// `column` of the first matching row, as a string
    async fn field(&self, table: &str, filter: &RecordFilter, column: &str)
        -> StoreResult<Option<String>>;

    /// `column` of every matching row
    async fn fields(
        &self,
        table: &str,
        filter: &RecordFilter,
        column: &str,
    ) -> StoreResult<Vec<Option<String>>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_builder() {
        let tenant = TenantId::new("t-1");
        let filter = RecordFilter::by_id(&EntityId::new("p-1"))
            .tenant(Some(&tenant))
            .not_null("sales_mandate_consent_id");

        assert_eq!(filter.conditions.len(), 3);
        assert_eq!(
            filter.conditions[1],
            Condition::Eq("tenant_id".into(), Value::from("t-1"))
        );
    }

    #[test]
    fn test_filter_without_tenant() {
        let filter = RecordFilter::new().tenant(None);
        assert!(filter.conditions.is_empty());
    }
}
