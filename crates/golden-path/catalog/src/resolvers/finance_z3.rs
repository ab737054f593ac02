//! GP-FINANCE-Z3 resolver: one finance request (`entity_id`)

use std::sync::Arc;

use async_trait::async_trait;
use golden_path_resolvers::{ContextResolver, DomainStore, FlagSet, RecordFilter};
use golden_path_types::{EntityId, FlagMap, TenantId};

use super::status_in;

pub const FLAGS: &[&str] = &[
    "finance_request_created",
    "lead_created",
    "dataroom_created",
    "confirmation_email_sent",
    "z1_triaged",
    "manager_assigned",
    "akte_complete",
    "bank_submitted",
];

const CONFIRMATION_TEMPLATE: &str = "finance_request_confirmation";

// Request status progression
const TRIAGED: &[&str] = &[
    "triaged",
    "assigned",
    "in_processing",
    "ready_for_bank",
    "submitted_to_bank",
];
const BANK_READY: &[&str] = &["ready_for_bank", "submitted_to_bank"];
const SUBMITTED: &[&str] = &["submitted_to_bank"];

pub struct FinanceZ3Resolver {
    store: Arc<dyn DomainStore>,
}

impl FinanceZ3Resolver {
    pub fn new(store: Arc<dyn DomainStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ContextResolver for FinanceZ3Resolver {
    async fn resolve(&self, tenant_id: Option<&TenantId>, entity_id: Option<&EntityId>) -> FlagMap {
        let mut flags = FlagSet::declare("GP-FINANCE-Z3", FLAGS);
        let Some(request) = entity_id else {
            return flags.into_map();
        };
        let store = self.store.as_ref();

        let request_filter = RecordFilter::by_id(request).tenant(tenant_id);
        let by_request = RecordFilter::new().eq("finance_request_id", request.as_str());
        let lead = RecordFilter::new().eq("source_request_id", request.as_str());
        let mail = by_request.clone().eq("template", CONFIRMATION_TEMPLATE);
        let mandate = by_request.clone().not_null("assigned_manager_id");

        let (exists, status, lead, dataroom, mail, mandate) = tokio::join!(
            store.exists("finance_requests", &request_filter),
            store.field("finance_requests", &request_filter, "status"),
            store.exists("leads", &lead),
            store.exists("storage_nodes", &by_request),
            store.exists("system_mail_log", &mail),
            store.exists("finance_mandates", &mandate),
        );

        flags.record("finance_request_created", exists);
        flags.record("lead_created", lead);
        flags.record("dataroom_created", dataroom);
        flags.record("confirmation_email_sent", mail);
        flags.record("manager_assigned", mandate);

        match status {
            Ok(status) => {
                let status = status.as_deref();
                flags.set("z1_triaged", status_in(status, TRIAGED));
                flags.set("akte_complete", status_in(status, BANK_READY));
                flags.set("bank_submitted", status_in(status, SUBMITTED));
            }
            Err(err) => {
                tracing::warn!(
                    module_code = "GP-FINANCE-Z3",
                    error = %err,
                    "Status lookup failed, progression flags resolved to false"
                );
            }
        }

        flags.into_map()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use golden_path_resolvers::InMemoryDomainStore;
    use serde_json::json;

    async fn resolve(store: InMemoryDomainStore) -> FlagMap {
        FinanceZ3Resolver::new(Arc::new(store))
            .resolve(None, Some(&EntityId::new("fr-1")))
            .await
    }

    #[tokio::test]
    async fn test_submitted_request() {
        let store = InMemoryDomainStore::new();
        store.insert("finance_requests", json!({ "id": "fr-1", "status": "submitted" }));
        store.insert("leads", json!({ "source_request_id": "fr-1" }));

        let flags = resolve(store).await;
        assert!(flags["finance_request_created"]);
        assert!(flags["lead_created"]);
        assert!(!flags["z1_triaged"]);
        assert!(!flags["manager_assigned"]);
    }

    #[tokio::test]
    async fn test_status_progression() {
        let store = InMemoryDomainStore::new();
        store.insert("finance_requests", json!({ "id": "fr-1", "status": "ready_for_bank" }));
        store.insert(
            "finance_mandates",
            json!({ "finance_request_id": "fr-1", "assigned_manager_id": "u-9" }),
        );

        let flags = resolve(store).await;
        assert!(flags["z1_triaged"]);
        assert!(flags["manager_assigned"]);
        assert!(flags["akte_complete"]);
        assert!(!flags["bank_submitted"]);
    }

    #[tokio::test]
    async fn test_unassigned_mandate() {
        let store = InMemoryDomainStore::new();
        store.insert("finance_requests", json!({ "id": "fr-1", "status": "triaged" }));
        store.insert(
            "finance_mandates",
            json!({ "finance_request_id": "fr-1", "assigned_manager_id": null }),
        );

        let flags = resolve(store).await;
        assert!(flags["z1_triaged"]);
        assert!(!flags["manager_assigned"]);
    }

    #[tokio::test]
    async fn test_store_outage_is_total() {
        let store = InMemoryDomainStore::new();
        store.fail_table("finance_requests");
        let flags = resolve(store).await;
        assert_eq!(flags.len(), FLAGS.len());
        assert!(flags.values().all(|v| !v));
    }
}
