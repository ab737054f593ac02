//! GP-PET: Pet Manager customer lifecycle
//!
//! Entry through a Zone 3 lead or a MOD-05 booking request, a Zone 1
//! profile, assignment to a Zone 2 provider, the pet record, and the first
//! booking.

use golden_path_types::{
    ContractDirection, ContractRef, FailStateHandler, FailStateKind, GoldenPathDefinition,
    GoldenPathResult, RecoveryStrategy, Step, SuccessState, Zone,
};

use super::{done, pre};

pub const MODULE_CODE: &str = "GP-PET";

pub const PET_DESK_ROUTE: &str = "/admin/pet-desk";
pub const CUSTOMERS_ROUTE: &str = "/portal/petmanager/kunden";

pub fn definition() -> GoldenPathResult<GoldenPathDefinition> {
    GoldenPathDefinition::new(MODULE_CODE)
        .with_version("1.0.0")
        .with_label("Pet Manager Lifecycle: Vom Kunden bis zur aktiven Betreuung")
        .with_description(
            "Kunden-Lebenszyklus im Pet Manager: Erfassung, Z1-Profil, Zuweisung, Tierakte, erste Buchung.",
        )
        .with_ledger_event("pet.lead.captured")
        .with_ledger_event("pet.z1.profile.created")
        .with_ledger_event("pet.customer.created")
        .with_ledger_event("pet.customer.assigned")
        .with_ledger_event("pet.mod05.linked")
        .with_ledger_event("pet.booking.first_completed")
        .with_success_state(
            SuccessState::new(["customer_exists", "pet_exists", "first_booking_completed"])
                .with_description("Kunde hat Tiere und mindestens eine abgeschlossene Buchung."),
        )
        .with_failure_redirect(CUSTOMERS_ROUTE)
        // Phase 1: Z3 → Z1
        .with_step(
            Step::system("capture_lead")
                .in_phase(1)
                .with_label("Lead-Erfassung (Website / MOD-05)")
                .with_contract(
                    ContractRef::new(
                        "CONTRACT_PET_LEAD_CAPTURE",
                        ContractDirection::new(Zone::Website, Zone::Admin),
                    )
                    .with_correlation_keys(["lead_id", "provider_id", "source_url"])
                    .with_description("Lead wird per Website-Formular oder MOD-05 Buchungsanfrage erfasst"),
                )
                .with_completion(done("lead_captured", "pet_z1_customers", "Anfrage wurde erfasst"))
                .on(
                    FailStateKind::Timeout,
                    FailStateHandler::escalate("pet.lead.capture.timeout")
                        .with_status_update("stale")
                        .with_description("Erfassung nicht bestaetigt"),
                )
                .on(
                    FailStateKind::Duplicate,
                    FailStateHandler::new("pet.lead.capture.duplicate_detected")
                        .with_recovery(RecoveryStrategy::Ignore)
                        .with_status_update("unchanged")
                        .with_description("Gleiche E-Mail beim gleichen Provider bereits erfasst"),
                )
                .on(
                    FailStateKind::Error,
                    FailStateHandler::retry("pet.lead.capture.error", 3)
                        .with_status_update("error")
                        .with_description("Technischer Fehler bei der Lead-Erfassung"),
                ),
        )?
        // Phase 2: Z1 admin profile
        .with_step(
            Step::action("create_z1_profile")
                .in_phase(2)
                .with_label("Kundenprofil in Zone 1 anlegen")
                .at_route(PET_DESK_ROUTE)
                .with_precondition(pre("lead_captured", "pet_z1_customers", "Anfrage muss erfasst sein"))
                .with_completion(done(
                    "z1_profile_created",
                    "pet_z1_customers",
                    "Kundenprofil in Zone 1 existiert",
                ))
                .on(
                    FailStateKind::Error,
                    FailStateHandler::retry("pet.z1.profile.create.error", 3)
                        .with_status_update("error")
                        .with_description("Fehler beim Anlegen des Z1-Profils"),
                ),
        )?
        // Phase 3: Z1 → Z2
        .with_step(
            Step::action("qualify_and_assign")
                .in_phase(3)
                .with_label("Kunden qualifizieren und Provider zuweisen")
                .at_route(PET_DESK_ROUTE)
                .with_sla_hours(48)
                .with_contract(
                    ContractRef::new(
                        "CONTRACT_PET_CUSTOMER_ASSIGN",
                        ContractDirection::new(Zone::Admin, Zone::Portal),
                    )
                    .with_correlation_keys(["z1_customer_id", "provider_id", "tenant_id"])
                    .with_description("Zuweisung erzeugt einen Kunden beim Provider"),
                )
                .with_precondition(pre(
                    "z1_profile_created",
                    "pet_z1_customers",
                    "Kundenprofil in Zone 1 muss existieren",
                ))
                .with_completion(done("customer_exists", "pet_customers", "Kunde beim Provider existiert"))
                .on(
                    FailStateKind::Timeout,
                    FailStateHandler::escalate("pet.customer.assign.timeout")
                        .with_status_update("stale")
                        .with_description("Keine Zuweisung innerhalb von 48 Stunden"),
                )
                .on(
                    FailStateKind::Rejected,
                    FailStateHandler::new("pet.customer.assign.rejected")
                        .with_recovery(RecoveryStrategy::ManualReview)
                        .with_status_update("rejected")
                        .with_description("Provider hat den Kunden abgelehnt"),
                )
                .on(
                    FailStateKind::Error,
                    FailStateHandler::retry("pet.customer.assign.error", 3)
                        .with_status_update("error")
                        .with_description("Technischer Fehler bei der Zuweisung"),
                ),
        )?
        .with_step(
            Step::action("complete_provider_profile")
                .in_phase(3)
                .with_label("Provider-Profil vervollstaendigen")
                .at_route("/portal/petmanager/profil")
                .with_precondition(pre("customer_exists", "pet_customers", "Provider muss existieren"))
                .with_completion(done("profile_has_bio", "pet_providers", "Beschreibung ausgefuellt"))
                .with_completion(done("profile_has_cover", "pet_providers", "Cover-Bild hochgeladen"))
                .with_completion(done(
                    "profile_has_services",
                    "pet_services",
                    "Mindestens ein aktiver Service definiert",
                )),
        )?
        // Phase 4
        .with_step(
            Step::action("create_pet_profile")
                .in_phase(4)
                .with_label("Tierakte anlegen oder verknuepfen")
                .at_route(CUSTOMERS_ROUTE)
                .with_precondition(pre("customer_exists", "pet_customers", "Kunde muss existieren"))
                .with_completion(done("pet_exists", "pets", "Mindestens ein Tier vorhanden")),
        )?
        // Phase 5
        .with_step(
            Step::action("first_booking")
                .in_phase(5)
                .with_label("Erste Buchung durchfuehren")
                .at_route("/portal/petmanager/kalender")
                .with_precondition(pre("pet_exists", "pets", "Mindestens ein Tier muss existieren"))
                .with_completion(done(
                    "first_booking_completed",
                    "pet_bookings",
                    "Mindestens eine Buchung bestaetigt oder abgeschlossen",
                )),
        )?
        // Phase 6: success, no completion of its own
        .with_step(
            Step::system("active_customer")
                .in_phase(6)
                .with_label("Aktiver Kunde")
                .with_precondition(pre("customer_exists", "pet_customers", "Kunde existiert"))
                .with_precondition(pre("pet_exists", "pets", "Tier existiert"))
                .with_precondition(pre(
                    "first_booking_completed",
                    "pet_bookings",
                    "Erste Buchung abgeschlossen",
                )),
        )
}
