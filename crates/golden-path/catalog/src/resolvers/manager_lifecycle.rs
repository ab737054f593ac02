//! GP-MANAGER-LIFECYCLE resolver
//!
//! `entity_id` is the manager application. Everything after approval is
//! read from the applicant organization (`tenant_id`); without a tenant
//! those flags stay false.

use std::sync::Arc;

use async_trait::async_trait;
use golden_path_resolvers::{ContextResolver, DomainStore, FlagSet, RecordFilter, StoreResult};
use golden_path_types::{EntityId, FlagMap, TenantId};

use super::status_in;

pub const FLAGS: &[&str] = &[
    "application_submitted",
    "application_in_review",
    "qualification_passed",
    "application_approved",
    "org_type_upgraded",
    "tiles_activated",
    "welcome_sent",
    "first_client_assigned",
    "org_link_active",
    "delegation_active",
];

// Application status progression. A rejection happens during review.
const SUBMITTED: &[&str] = &["submitted", "in_review", "approved", "rejected"];
const IN_REVIEW: &[&str] = &["in_review", "approved", "rejected"];
const APPROVED: &[&str] = &["approved"];

const PARTNER_ORG_TYPE: &str = "partner";
const WELCOME_KIND: &str = "manager_welcome";
const MANAGES_LINK: &str = "manages";

pub struct ManagerLifecycleResolver {
    store: Arc<dyn DomainStore>,
}

impl ManagerLifecycleResolver {
    pub fn new(store: Arc<dyn DomainStore>) -> Self {
        Self { store }
    }

    /// Active activation of the requested tile, or of any tile when the
    /// application names none. A failed tile lookup fails the check.
    async fn tile_active(
        &self,
        tenant: &TenantId,
        tile_code: StoreResult<Option<String>>,
    ) -> StoreResult<bool> {
        let mut filter = RecordFilter::new()
            .eq("tenant_id", tenant.as_str())
            .eq("status", "active");
        if let Some(code) = tile_code? {
            filter = filter.eq("tile_code", code);
        }
        self.store.exists("tenant_tile_activation", &filter).await
    }
}

#[async_trait]
impl ContextResolver for ManagerLifecycleResolver {
    async fn resolve(&self, tenant_id: Option<&TenantId>, entity_id: Option<&EntityId>) -> FlagMap {
        let mut flags = FlagSet::declare("GP-MANAGER-LIFECYCLE", FLAGS);
        let Some(application) = entity_id else {
            return flags.into_map();
        };
        let store = self.store.as_ref();

        let application_filter = RecordFilter::by_id(application).tenant(tenant_id);
        let qualified = application_filter.clone().not_null("qualification_passed_at");

        let (status, qualification, tile_code) = tokio::join!(
            store.field("manager_applications", &application_filter, "status"),
            store.exists("manager_applications", &qualified),
            store.field("manager_applications", &application_filter, "requested_tile"),
        );

        flags.record("qualification_passed", qualification);
        match status {
            Ok(status) => {
                let status = status.as_deref();
                flags.set("application_submitted", status_in(status, SUBMITTED));
                flags.set("application_in_review", status_in(status, IN_REVIEW));
                flags.set("application_approved", status_in(status, APPROVED));
            }
            Err(err) => {
                tracing::warn!(
                    module_code = "GP-MANAGER-LIFECYCLE",
                    error = %err,
                    "Application status lookup failed, progression flags resolved to false"
                );
            }
        }

        let Some(tenant) = tenant_id else {
            return flags.into_map();
        };
        let partner = RecordFilter::new()
            .eq("id", tenant.as_str())
            .eq("org_type", PARTNER_ORG_TYPE);
        let welcome = RecordFilter::new()
            .eq("tenant_id", tenant.as_str())
            .eq("kind", WELCOME_KIND);
        let client_link = RecordFilter::new()
            .eq("from_org_id", tenant.as_str())
            .eq("link_type", MANAGES_LINK);
        let active_link = client_link.clone().eq("status", "active");
        let delegation = RecordFilter::new()
            .eq("delegate_org_id", tenant.as_str())
            .eq("status", "active");

        let (upgraded, tiles, welcome_sent, linked, link_active, delegated) = tokio::join!(
            store.exists("organizations", &partner),
            self.tile_active(tenant, tile_code),
            store.exists("notifications", &welcome),
            store.exists("org_links", &client_link),
            store.exists("org_links", &active_link),
            store.exists("org_delegations", &delegation),
        );

        flags.record("org_type_upgraded", upgraded);
        flags.record("tiles_activated", tiles);
        flags.record("welcome_sent", welcome_sent);
        flags.record("first_client_assigned", linked);
        flags.record("org_link_active", link_active);
        flags.record("delegation_active", delegated);

        flags.into_map()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use golden_path_resolvers::InMemoryDomainStore;
    use serde_json::json;

    fn application(status: &str) -> InMemoryDomainStore {
        let store = InMemoryDomainStore::new();
        store.insert(
            "manager_applications",
            json!({
                "id": "app-1",
                "tenant_id": "org-1",
                "status": status,
                "requested_tile": "MOD-11",
                "qualification_passed_at": null
            }),
        );
        store.insert("organizations", json!({ "id": "org-1", "org_type": "client" }));
        store
    }

    async fn resolve(store: InMemoryDomainStore, tenant: Option<&str>) -> FlagMap {
        let tenant = tenant.map(TenantId::new);
        ManagerLifecycleResolver::new(Arc::new(store))
            .resolve(tenant.as_ref(), Some(&EntityId::new("app-1")))
            .await
    }

    #[tokio::test]
    async fn test_submitted_application() {
        let flags = resolve(application("submitted"), Some("org-1")).await;
        assert!(flags["application_submitted"]);
        assert!(!flags["application_in_review"]);
        assert!(!flags["org_type_upgraded"]);
        assert_eq!(flags.len(), FLAGS.len());
    }

    #[tokio::test]
    async fn test_rejected_application_never_approves() {
        let flags = resolve(application("rejected"), Some("org-1")).await;
        assert!(flags["application_in_review"]);
        assert!(!flags["application_approved"]);
    }

    #[tokio::test]
    async fn test_activated_manager_with_client() {
        let store = InMemoryDomainStore::new();
        store.insert(
            "manager_applications",
            json!({
                "id": "app-1",
                "tenant_id": "org-1",
                "status": "approved",
                "requested_tile": "MOD-11",
                "qualification_passed_at": "2026-03-02"
            }),
        );
        store.insert("organizations", json!({ "id": "org-1", "org_type": "partner" }));
        store.insert(
            "tenant_tile_activation",
            json!({ "tenant_id": "org-1", "tile_code": "MOD-11", "status": "active" }),
        );
        store.insert(
            "org_links",
            json!({ "from_org_id": "org-1", "to_org_id": "org-7", "link_type": "manages", "status": "pending" }),
        );

        let flags = resolve(store, Some("org-1")).await;
        assert!(flags["qualification_passed"]);
        assert!(flags["application_approved"]);
        assert!(flags["org_type_upgraded"]);
        assert!(flags["tiles_activated"]);
        assert!(flags["first_client_assigned"]);
        assert!(!flags["org_link_active"]);
        assert!(!flags["welcome_sent"]);
        assert!(!flags["delegation_active"]);
    }

    #[tokio::test]
    async fn test_other_tile_does_not_count() {
        let store = application("approved");
        store.insert(
            "tenant_tile_activation",
            json!({ "tenant_id": "org-1", "tile_code": "MOD-22", "status": "active" }),
        );
        let flags = resolve(store, Some("org-1")).await;
        assert!(!flags["tiles_activated"]);
    }

    #[tokio::test]
    async fn test_without_tenant_only_application_flags() {
        let store = application("approved");
        store.insert("organizations", json!({ "id": "org-2", "org_type": "partner" }));
        let flags = resolve(store, None).await;
        assert!(flags["application_approved"]);
        assert!(!flags["org_type_upgraded"]);
    }

    #[tokio::test]
    async fn test_application_outage_is_fail_closed() {
        let store = application("approved");
        store.fail_table("manager_applications");
        let flags = resolve(store, Some("org-1")).await;
        assert!(!flags["application_submitted"]);
        assert!(!flags["application_approved"]);
        assert!(!flags["tiles_activated"]);
        assert_eq!(flags.len(), FLAGS.len());
    }
}
