//! MOD-04 resolver: property, listing, and publication state

use std::sync::Arc;

use async_trait::async_trait;
use golden_path_resolvers::{
    all_equal, ContextResolver, DomainStore, FlagSet, RecordFilter, StoreResult,
};
use golden_path_types::{EntityId, FlagMap, TenantId};

use super::both;

/// Every flag the resolver produces
pub const FLAGS: &[&str] = &[
    "tenant_exists",
    "property_exists",
    "main_unit_exists",
    "folder_structure_exists",
    "unit_visible_in_mod05",
    "verkaufsauftrag_active",
    "kaufy_sichtbarkeit_active",
    "features_inactive",
    "listing_active",
    "listing_withdrawn",
    "sales_mandate_consent_linked",
    "contract_visible",
    "sales_desk_entry_visible",
    "partner_network_active",
    "katalog_visible",
    "suche_visible",
    "kaufy_publication_active",
    "kaufy_website_visible",
    "publications_paused",
];

const FEATURE_SALES_MANDATE: &str = "verkaufsauftrag";
const FEATURE_KAUFY: &str = "kaufy_sichtbarkeit";
const CHANNEL_PARTNER_NETWORK: &str = "partner_network";
const CHANNEL_KAUFY: &str = "kaufy";

/// Resolves the property lifecycle of one property (`entity_id`)
pub struct PropertyResolver {
    store: Arc<dyn DomainStore>,
}

impl PropertyResolver {
    pub fn new(store: Arc<dyn DomainStore>) -> Self {
        Self { store }
    }

    fn feature(&self, property: &EntityId, code: &str) -> RecordFilter {
        RecordFilter::new()
            .eq("property_id", property.as_str())
            .eq("feature_code", code)
    }

    fn publication(&self, listing_id: &str, channel: &str) -> RecordFilter {
        RecordFilter::new()
            .eq("listing_id", listing_id)
            .eq("channel", channel)
    }
}

#[async_trait]
impl ContextResolver for PropertyResolver {
    async fn resolve(&self, tenant_id: Option<&TenantId>, entity_id: Option<&EntityId>) -> FlagMap {
        let mut flags = FlagSet::declare("MOD-04", FLAGS);
        let store = self.store.as_ref();

        if let Some(tenant) = tenant_id {
            flags.record(
                "tenant_exists",
                store.exists("organizations", &RecordFilter::new().eq("id", tenant.as_str())).await,
            );
        }

        let Some(property) = entity_id else {
            return flags.into_map();
        };

        let by_property = RecordFilter::new()
            .eq("property_id", property.as_str())
            .tenant(tenant_id);
        let property_filter = RecordFilter::by_id(property).tenant(tenant_id);
        let main_unit = by_property.clone().eq("unit_number", "MAIN");
        let sales_feature = self.feature(property, FEATURE_SALES_MANDATE).eq("status", "active");
        let kaufy_feature = self.feature(property, FEATURE_KAUFY).eq("status", "active");
        let active_listing = by_property.clone().eq("status", "active");
        let withdrawn_listing = by_property.clone().eq("status", "withdrawn");
        let consent = by_property.clone().not_null("sales_mandate_consent_id");
        let property_features = RecordFilter::new().eq("property_id", property.as_str());

        let (
            property_exists,
            main_unit_exists,
            folders,
            sales_mandate,
            kaufy,
            feature_statuses,
            listing_active,
            listing_withdrawn,
            consent_linked,
            active_listing_id,
            withdrawn_listing_id,
        ) = tokio::join!(
            store.exists("properties", &property_filter),
            store.exists("units", &main_unit),
            store.exists("storage_nodes", &by_property),
            store.exists("property_features", &sales_feature),
            store.exists("property_features", &kaufy_feature),
            store.fields(
                "property_features",
                &property_features,
                "status"
            ),
            store.exists("listings", &active_listing),
            store.exists("listings", &withdrawn_listing),
            store.exists("listings", &consent),
            store.field("listings", &active_listing, "id"),
            store.field("listings", &withdrawn_listing, "id"),
        );

        flags.set("unit_visible_in_mod05", both(&property_exists, &main_unit_exists));
        flags.set("sales_desk_entry_visible", both(&listing_active, &consent_linked));
        flags.set("suche_visible", matches!(listing_active, Ok(true)));
        flags.set("contract_visible", matches!(consent_linked, Ok(true)));
        flags.set(
            "features_inactive",
            feature_statuses
                .as_deref()
                .is_ok_and(|statuses| all_equal(statuses, "inactive")),
        );

        let kaufy_active = matches!(kaufy, Ok(true));
        flags.record("property_exists", property_exists);
        flags.record("main_unit_exists", main_unit_exists);
        flags.record("folder_structure_exists", folders);
        flags.record("verkaufsauftrag_active", sales_mandate);
        flags.record("kaufy_sichtbarkeit_active", kaufy);
        flags.record("listing_active", listing_active);
        flags.record("listing_withdrawn", listing_withdrawn);
        flags.record("sales_mandate_consent_linked", consent_linked);

        // Publications hang off the current listing: the active one, else
        // the withdrawn one a deactivated mandate leaves behind.
        let listing_id = match current_listing(active_listing_id, withdrawn_listing_id) {
            Ok(Some(id)) => id,
            Ok(None) => return flags.into_map(),
            Err(err) => {
                tracing::warn!(module_code = "MOD-04", error = %err, "Listing lookup failed");
                return flags.into_map();
            }
        };

        let partner = self.publication(&listing_id, CHANNEL_PARTNER_NETWORK).eq("status", "active");
        let kaufy_publication = self.publication(&listing_id, CHANNEL_KAUFY).eq("status", "active");
        let listing_publications = RecordFilter::new().eq("listing_id", listing_id.as_str());
        let (partner_active, kaufy_published, publication_statuses) = tokio::join!(
            store.exists("listing_publications", &partner),
            store.exists("listing_publications", &kaufy_publication),
            store.fields(
                "listing_publications",
                &listing_publications,
                "status"
            ),
        );

        flags.set("katalog_visible", matches!(partner_active, Ok(true)));
        flags.set(
            "kaufy_website_visible",
            kaufy_active && matches!(kaufy_published, Ok(true)),
        );
        flags.set(
            "publications_paused",
            publication_statuses
                .as_deref()
                .is_ok_and(|statuses| all_equal(statuses, "paused")),
        );
        flags.record("partner_network_active", partner_active);
        flags.record("kaufy_publication_active", kaufy_published);

        flags.into_map()
    }
}

/// An active listing wins. A failed active lookup is not papered over by
/// the withdrawn one.
fn current_listing(
    active: StoreResult<Option<String>>,
    withdrawn: StoreResult<Option<String>>,
) -> StoreResult<Option<String>> {
    match active? {
        Some(id) => Ok(Some(id)),
        None => withdrawn,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use golden_path_resolvers::InMemoryDomainStore;
    use serde_json::json;

    fn store() -> InMemoryDomainStore {
        let store = InMemoryDomainStore::new();
        store.insert("organizations", json!({ "id": "t-1" }));
        store.insert("properties", json!({ "id": "p-1", "tenant_id": "t-1" }));
        store.insert(
            "units",
            json!({ "property_id": "p-1", "tenant_id": "t-1", "unit_number": "MAIN" }),
        );
        store
    }

    async fn resolve(store: InMemoryDomainStore) -> FlagMap {
        let resolver = PropertyResolver::new(Arc::new(store));
        resolver
            .resolve(Some(&TenantId::new("t-1")), Some(&EntityId::new("p-1")))
            .await
    }

    #[tokio::test]
    async fn test_every_flag_is_present() {
        let resolver = PropertyResolver::new(Arc::new(InMemoryDomainStore::new()));
        let flags = resolver.resolve(None, None).await;
        assert_eq!(flags.len(), FLAGS.len());
        assert!(flags.values().all(|v| !v));
    }

    #[tokio::test]
    async fn test_fresh_property() {
        let flags = resolve(store()).await;
        assert!(flags["tenant_exists"]);
        assert!(flags["property_exists"]);
        assert!(flags["main_unit_exists"]);
        assert!(flags["unit_visible_in_mod05"]);
        assert!(!flags["folder_structure_exists"]);
        assert!(!flags["listing_active"]);
        assert!(!flags["features_inactive"]);
    }

    #[tokio::test]
    async fn test_active_mandate_with_publications() {
        let store = store();
        store.insert(
            "property_features",
            json!({ "property_id": "p-1", "feature_code": "verkaufsauftrag", "status": "active" }),
        );
        store.insert(
            "listings",
            json!({
                "id": "l-1",
                "property_id": "p-1",
                "tenant_id": "t-1",
                "status": "active",
                "sales_mandate_consent_id": "c-1"
            }),
        );
        store.insert(
            "listing_publications",
            json!({ "listing_id": "l-1", "channel": "partner_network", "status": "active" }),
        );
        store.insert(
            "listing_publications",
            json!({ "listing_id": "l-1", "channel": "kaufy", "status": "active" }),
        );

        let flags = resolve(store).await;
        assert!(flags["verkaufsauftrag_active"]);
        assert!(flags["sales_desk_entry_visible"]);
        assert!(flags["katalog_visible"]);
        assert!(flags["kaufy_publication_active"]);
        // Kaufy feature itself not active
        assert!(!flags["kaufy_website_visible"]);
        assert!(!flags["publications_paused"]);
    }

    #[tokio::test]
    async fn test_paused_requires_every_publication() {
        let store = store();
        store.insert(
            "listings",
            json!({ "id": "l-1", "property_id": "p-1", "tenant_id": "t-1", "status": "withdrawn" }),
        );
        store.insert(
            "listing_publications",
            json!({ "listing_id": "l-1", "channel": "partner_network", "status": "paused" }),
        );
        store.insert(
            "listing_publications",
            json!({ "listing_id": "l-1", "channel": "kaufy", "status": "active" }),
        );

        let flags = resolve(store).await;
        assert!(flags["listing_withdrawn"]);
        assert!(!flags["publications_paused"]);
    }

    #[tokio::test]
    async fn test_publications_follow_the_active_listing() {
        let store = store();
        store.insert(
            "listings",
            json!({ "id": "l-old", "property_id": "p-1", "tenant_id": "t-1", "status": "withdrawn" }),
        );
        store.insert(
            "listings",
            json!({ "id": "l-new", "property_id": "p-1", "tenant_id": "t-1", "status": "active" }),
        );
        store.insert(
            "listing_publications",
            json!({ "listing_id": "l-old", "channel": "kaufy", "status": "paused" }),
        );
        store.insert(
            "listing_publications",
            json!({ "listing_id": "l-new", "channel": "partner_network", "status": "active" }),
        );

        let flags = resolve(store).await;
        assert!(flags["listing_active"]);
        assert!(flags["listing_withdrawn"]);
        assert!(flags["partner_network_active"]);
        assert!(flags["katalog_visible"]);
        assert!(!flags["kaufy_publication_active"]);
        // Only the stale listing's publications are paused
        assert!(!flags["publications_paused"]);
    }

    #[tokio::test]
    async fn test_withdrawn_listing_reports_paused_publications() {
        let store = store();
        store.insert(
            "listings",
            json!({ "id": "l-1", "property_id": "p-1", "tenant_id": "t-1", "status": "draft" }),
        );
        store.insert(
            "listings",
            json!({ "id": "l-2", "property_id": "p-1", "tenant_id": "t-1", "status": "withdrawn" }),
        );
        store.insert(
            "listing_publications",
            json!({ "listing_id": "l-2", "channel": "partner_network", "status": "paused" }),
        );
        store.insert(
            "listing_publications",
            json!({ "listing_id": "l-2", "channel": "kaufy", "status": "paused" }),
        );

        let flags = resolve(store).await;
        assert!(!flags["listing_active"]);
        assert!(flags["publications_paused"]);
        assert!(!flags["partner_network_active"]);
    }

    #[test]
    fn test_current_listing_selection() {
        let id = |s: &str| -> StoreResult<Option<String>> { Ok(Some(s.to_string())) };
        assert_eq!(current_listing(id("a"), id("w")).unwrap().as_deref(), Some("a"));
        assert_eq!(current_listing(Ok(None), id("w")).unwrap().as_deref(), Some("w"));
        assert!(current_listing(Ok(None), Ok(None)).unwrap().is_none());

        let outage = Err(golden_path_resolvers::StoreError::Unavailable("down".into()));
        assert!(current_listing(outage, id("w")).is_err());
    }

    #[tokio::test]
    async fn test_failing_table_resolves_false() {
        let store = store();
        store.fail_table("units");
        let flags = resolve(store).await;
        assert!(flags["property_exists"]);
        assert!(!flags["main_unit_exists"]);
        assert!(!flags["unit_visible_in_mod05"]);
        assert_eq!(flags.len(), FLAGS.len());
    }
}
