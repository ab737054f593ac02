//! In-memory domain store for development and testing.
//!
//! Rows are JSON objects grouped by table name. Tables can be marked as
//! failing to exercise the fail-closed paths of resolvers.

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::store::{Condition, DomainStore, RecordFilter, StoreError, StoreResult};

/// A single row
pub type Row = Map<String, Value>;

/// In-memory store implementation.
#[derive(Clone, Default)]
pub struct InMemoryDomainStore {
    tables: Arc<DashMap<String, Vec<Row>>>,
    failing: Arc<DashSet<String>>,
}

impl InMemoryDomainStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row. Non-object values are ignored.
    pub fn insert(&self, table: impl Into<String>, row: Value) {
        if let Value::Object(row) = row {
            self.tables.entry(table.into()).or_default().push(row);
        }
    }

    /// Make every lookup against `table` fail
    pub fn fail_table(&self, table: impl Into<String>) {
        self.failing.insert(table.into());
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.tables.get(table).map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn clear(&self) {
        self.tables.clear();
        self.failing.clear();
    }

    fn matching(&self, table: &str, filter: &RecordFilter) -> StoreResult<Vec<Row>> {
        if self.failing.contains(table) {
            return Err(StoreError::Unavailable(format!("table '{}' offline", table)));
        }
        Ok(self
            .tables
            .get(table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_filter(row, filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

fn matches_filter(row: &Row, filter: &RecordFilter) -> bool {
    filter.conditions.iter().all(|condition| match condition {
        Condition::Eq(column, expected) => row.get(column) == Some(expected),
        Condition::NotNull(column) => row.get(column).is_some_and(|v| !v.is_null()),
    })
}

fn value_to_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl DomainStore for InMemoryDomainStore {
    async fn exists(&self, table: &str, filter: &RecordFilter) -> StoreResult<bool> {
        Ok(!self.matching(table, filter)?.is_empty())
    }

    async fn count(&self, table: &str, filter: &RecordFilter) -> StoreResult<u64> {
        Ok(self.matching(table, filter)?.len() as u64)
    }

    async fn field(
        &self,
        table: &str,
        filter: &RecordFilter,
        column: &str,
    ) -> StoreResult<Option<String>> {
        Ok(self
            .matching(table, filter)?
            .first()
            .and_then(|row| value_to_string(row.get(column))))
    }

    async fn fields(
        &self,
        table: &str,
        filter: &RecordFilter,
        column: &str,
    ) -> StoreResult<Vec<Option<String>>> {
        Ok(self
            .matching(table, filter)?
            .iter()
            .map(|row| value_to_string(row.get(column)))
            .collect())
    }
}
