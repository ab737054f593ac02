//! GP-PET resolver
//!
//! `entity_id` is the Zone 1 customer record. The provider-side customer,
//! its pets, and bookings are reached through it.

use std::sync::Arc;

use async_trait::async_trait;
use golden_path_resolvers::{ContextResolver, DomainStore, FlagSet, RecordFilter, StoreResult};
use golden_path_types::{EntityId, FlagMap, TenantId};

use super::status_in;

pub const FLAGS: &[&str] = &[
    "lead_captured",
    "z1_profile_created",
    "customer_exists",
    "profile_has_bio",
    "profile_has_cover",
    "profile_has_services",
    "pet_exists",
    "first_booking_completed",
];

const BOOKED: &[&str] = &["confirmed", "completed"];

pub struct PetResolver {
    store: Arc<dyn DomainStore>,
}

impl PetResolver {
    pub fn new(store: Arc<dyn DomainStore>) -> Self {
        Self { store }
    }

    /// `false` without a filter
    async fn exists_if(&self, table: &str, filter: Option<RecordFilter>) -> StoreResult<bool> {
        match filter {
            Some(filter) => self.store.exists(table, &filter).await,
            None => Ok(false),
        }
    }

    async fn has_booking(&self, customer_id: &str) -> StoreResult<bool> {
        let statuses = self
            .store
            .fields(
                "pet_bookings",
                &RecordFilter::new().eq("customer_id", customer_id),
                "status",
            )
            .await?;
        Ok(statuses.iter().any(|s| status_in(s.as_deref(), BOOKED)))
    }
}

#[async_trait]
impl ContextResolver for PetResolver {
    async fn resolve(&self, tenant_id: Option<&TenantId>, entity_id: Option<&EntityId>) -> FlagMap {
        let mut flags = FlagSet::declare("GP-PET", FLAGS);
        let Some(z1_customer) = entity_id else {
            return flags.into_map();
        };
        let store = self.store.as_ref();

        let z1_filter = RecordFilter::by_id(z1_customer);
        let z1_profile = z1_filter.clone().not_null("profile_created_at");
        let customer_filter = RecordFilter::new()
            .eq("z1_customer_id", z1_customer.as_str())
            .tenant(tenant_id);

        let (lead, profile, customer_id, provider_id) = tokio::join!(
            store.exists("pet_z1_customers", &z1_filter),
            store.exists("pet_z1_customers", &z1_profile),
            store.field("pet_customers", &customer_filter, "id"),
            store.field("pet_customers", &customer_filter, "provider_id"),
        );

        flags.record("lead_captured", lead);
        flags.record("z1_profile_created", profile);

        let customer_id = match customer_id {
            Ok(Some(id)) => id,
            Ok(None) => return flags.into_map(),
            Err(err) => {
                flags.record("customer_exists", Err(err));
                return flags.into_map();
            }
        };
        flags.set("customer_exists", true);

        let provider = provider_id.ok().flatten().map(EntityId::new);
        let bio_filter = provider
            .as_ref()
            .map(|p| RecordFilter::by_id(p).not_null("bio"));
        let cover_filter = provider
            .as_ref()
            .map(|p| RecordFilter::by_id(p).not_null("cover_image_url"));
        let services_filter = provider
            .as_ref()
            .map(|p| RecordFilter::new().eq("provider_id", p.as_str()).eq("is_active", true));
        let pets_filter = RecordFilter::new().eq("customer_id", customer_id.as_str());

        let (bio, cover, active_services, pets, booked) = tokio::join!(
            self.exists_if("pet_providers", bio_filter),
            self.exists_if("pet_providers", cover_filter),
            self.exists_if("pet_services", services_filter),
            store.exists("pets", &pets_filter),
            self.has_booking(&customer_id),
        );

        flags.record("profile_has_bio", bio);
        flags.record("profile_has_cover", cover);
        flags.record("profile_has_services", active_services);
        flags.record("pet_exists", pets);
        flags.record("first_booking_completed", booked);

        flags.into_map()
    }
}
