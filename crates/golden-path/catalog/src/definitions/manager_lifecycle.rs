//! GP-MANAGER-LIFECYCLE: from manager application to the first client
//!
//! Z2 application → Z1 verification and activation → Z1 → Z2 client
//! assignment. `entity_id` is the application, `tenant_id` the applicant's
//! organization.

use golden_path_types::{
    ContractDirection, ContractRef, FailStateHandler, FailStateKind, GoldenPathDefinition,
    GoldenPathResult, RecoveryStrategy, Step, SuccessState, Zone,
};

use super::{done, pre};

pub const MODULE_CODE: &str = "GP-MANAGER-LIFECYCLE";

pub const MASTER_DATA_ROUTE: &str = "/portal/stammdaten";
pub const DESK_ROUTE: &str = "/admin/armstrong";

/// Modules a manager reaches once the client link is active
pub const MANAGER_MODULES: [&str; 6] = ["MOD-09", "MOD-10", "MOD-11", "MOD-12", "MOD-13", "MOD-22"];

pub fn definition() -> GoldenPathResult<GoldenPathDefinition> {
    let mut link_step = Step::system("org_link_created")
        .in_phase(4)
        .with_label("org_link erstellt")
        .with_precondition(pre(
            "first_client_assigned",
            "org_links",
            "Client muss zugewiesen sein",
        ))
        .with_completion(done("org_link_active", "org_links", "org_link ist aktiv"));
    for module in MANAGER_MODULES {
        link_step = link_step.with_downstream(module);
    }

    GoldenPathDefinition::new(MODULE_CODE)
        .with_version("1.0.0")
        .with_label("Manager-Lifecycle: Von Bewerbung bis Kundenzuweisung")
        .with_description(
            "Selbstregistrierung, Manager-Bewerbung (Z2), Verifizierung und Freischaltung (Z1), \
             erste Kundenzuweisung (Z1 nach Z2).",
        )
        .with_ledger_event("manager.application.submitted")
        .with_ledger_event("manager.application.approved")
        .with_ledger_event("manager.org.upgraded")
        .with_ledger_event("manager.tiles.activated")
        .with_ledger_event("manager.first_client.assigned")
        .with_success_state(
            SuccessState::new([
                "application_submitted",
                "application_approved",
                "org_type_upgraded",
                "tiles_activated",
                "first_client_assigned",
            ])
            .with_description(
                "Manager ist freigeschaltet, hat sein Spezialmodul und mindestens einen Kunden.",
            ),
        )
        .with_failure_redirect(MASTER_DATA_ROUTE)
        // Phase 1: Z2 → Z1
        .with_step(
            Step::action("submit_application")
                .in_phase(1)
                .with_label("Manager-Bewerbung einreichen")
                .at_route(MASTER_DATA_ROUTE)
                .with_contract(
                    ContractRef::new(
                        "CONTRACT_MANAGER_APPLICATION",
                        ContractDirection::new(Zone::Portal, Zone::Admin),
                    )
                    .with_correlation_keys(["application_id", "tenant_id", "requested_role"])
                    .with_description("Bewerbung wird von Z2 an den Z1 Desk uebermittelt"),
                )
                .with_completion(done(
                    "application_submitted",
                    "manager_applications",
                    "Bewerbung ist eingereicht",
                ))
                .on(
                    FailStateKind::Timeout,
                    FailStateHandler::escalate("manager.application.submit.timeout")
                        .with_status_update("draft")
                        .with_description("Einreichung nicht im Desk angekommen"),
                )
                .on(
                    FailStateKind::Error,
                    FailStateHandler::retry("manager.application.submit.error", 3)
                        .with_status_update("draft")
                        .with_description("Technischer Fehler bei der Bewerbungseinreichung"),
                ),
        )?
        .with_step(
            Step::system("application_received")
                .in_phase(1)
                .with_label("Bewerbung im Desk eingegangen")
                .with_precondition(pre(
                    "application_submitted",
                    "manager_applications",
                    "Bewerbung muss eingereicht sein",
                ))
                .with_completion(done(
                    "application_in_review",
                    "manager_applications",
                    "Bewerbung ist in Pruefung",
                )),
        )?
        // Phase 2: Z1 verification
        .with_step(
            Step::action("qualification_check")
                .in_phase(2)
                .with_label("Qualifikationspruefung (Z1)")
                .at_route(DESK_ROUTE)
                .with_sla_hours(336)
                .with_precondition(pre(
                    "application_in_review",
                    "manager_applications",
                    "Bewerbung muss in Pruefung sein",
                ))
                .with_completion(done(
                    "qualification_passed",
                    "manager_applications",
                    "Qualifikation geprueft (z.B. §34i Nachweis)",
                ))
                .on(
                    FailStateKind::Timeout,
                    FailStateHandler::escalate("manager.qualification.check.timeout")
                        .with_status_update("in_review")
                        .with_description("14 Tage ohne Reaktion, Erinnerung an den Z1 Admin"),
                )
                .on(
                    FailStateKind::Rejected,
                    FailStateHandler::new("manager.application.rejected")
                        .with_recovery(RecoveryStrategy::ManualReview)
                        .with_status_update("rejected")
                        .with_description("Bewerbung abgelehnt, Bewerber kann erneut einreichen"),
                ),
        )?
        .with_step(
            Step::action("compliance_review")
                .in_phase(2)
                .with_label("Compliance-Review (Z1)")
                .at_route(DESK_ROUTE)
                .with_precondition(pre(
                    "qualification_passed",
                    "manager_applications",
                    "Qualifikation muss bestanden sein",
                ))
                .with_completion(done(
                    "application_approved",
                    "manager_applications",
                    "Bewerbung ist genehmigt",
                )),
        )?
        // Phase 3: Z1 activation
        .with_step(
            Step::system("org_type_upgrade")
                .in_phase(3)
                .with_label("Org-Typ auf Partner upgraden")
                .with_precondition(pre(
                    "application_approved",
                    "manager_applications",
                    "Bewerbung muss genehmigt sein",
                ))
                .with_completion(done(
                    "org_type_upgraded",
                    "organizations",
                    "Organisation ist vom Typ Partner",
                ))
                .on(
                    FailStateKind::Error,
                    FailStateHandler::retry("manager.org.upgrade.error", 3)
                        .with_status_update("approved")
                        .with_description("Org-Typ-Upgrade fehlgeschlagen, Rollback auf approved"),
                ),
        )?
        .with_step(
            Step::system("tile_activation")
                .in_phase(3)
                .with_label("Manager-Modul-Tiles aktivieren")
                .with_precondition(pre(
                    "org_type_upgraded",
                    "organizations",
                    "Org-Typ muss Partner sein",
                ))
                .with_completion(done(
                    "tiles_activated",
                    "tenant_tile_activation",
                    "Manager-Modul-Tile ist aktiv",
                ))
                .on(
                    FailStateKind::Error,
                    FailStateHandler::retry("manager.tiles.activation.error", 3)
                        .with_status_update("org_upgraded")
                        .with_description("Fehler bei der Tile-Aktivierung"),
                ),
        )?
        .with_step(
            Step::system("welcome_notification")
                .in_phase(3)
                .with_label("Willkommensbenachrichtigung senden")
                .with_precondition(pre(
                    "tiles_activated",
                    "tenant_tile_activation",
                    "Tiles muessen aktiviert sein",
                ))
                .with_completion(done(
                    "welcome_sent",
                    "notifications",
                    "Willkommensbenachrichtigung versendet",
                )),
        )?
        // Phase 4: Z1 → Z2
        .with_step(
            Step::action("first_client_assigned")
                .in_phase(4)
                .with_label("Erster Kunde zugewiesen")
                .at_route(DESK_ROUTE)
                .with_contract(
                    ContractRef::new(
                        "CONTRACT_CLIENT_ASSIGNMENT",
                        ContractDirection::new(Zone::Admin, Zone::Portal),
                    )
                    .with_correlation_keys(["manager_org_id", "client_org_id", "module_code"])
                    .with_description("Z1 erstellt org_link und Delegation fuer den Manager"),
                )
                .with_precondition(pre(
                    "tiles_activated",
                    "tenant_tile_activation",
                    "Manager muss freigeschaltet sein",
                ))
                .with_completion(done(
                    "first_client_assigned",
                    "org_links",
                    "Mindestens ein verwalteter Kunde ist verknuepft",
                ))
                .on(
                    FailStateKind::Timeout,
                    FailStateHandler::escalate("manager.first_client.assignment.timeout")
                        .with_status_update("unassigned")
                        .with_description("Kein Kunde zugewiesen"),
                )
                .on(
                    FailStateKind::Error,
                    FailStateHandler::retry("manager.first_client.assignment.error", 3)
                        .with_status_update("unassigned")
                        .with_description("Technischer Fehler bei der Kundenzuweisung"),
                ),
        )?
        .with_step(link_step)?
        .with_step(
            Step::system("delegation_granted")
                .in_phase(4)
                .with_label("Delegation erteilt")
                .with_precondition(pre("org_link_active", "org_links", "org_link muss aktiv sein"))
                .with_completion(done(
                    "delegation_active",
                    "org_delegations",
                    "Delegation ist aktiv",
                ))
                .on(
                    FailStateKind::Error,
                    FailStateHandler::retry("manager.delegation.grant.error", 3)
                        .with_status_update("org_link_active")
                        .with_description("Delegation fehlgeschlagen, org_link bleibt aktiv"),
                ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_shape() {
        let def = definition().unwrap();
        def.validate().unwrap();
        assert_eq!(def.step_count(), 10);
        assert_eq!(def.failure_redirect.as_deref(), Some(MASTER_DATA_ROUTE));
        assert_eq!(def.steps[7].downstream_modules.len(), 0);
        assert_eq!(def.steps[8].downstream_modules.len(), MANAGER_MODULES.len());
    }

    #[test]
    fn test_application_travels_portal_to_hub_and_back() {
        let def = definition().unwrap();
        let directions: Vec<String> = def
            .steps
            .iter()
            .flat_map(|s| &s.contract_refs)
            .map(|c| c.direction.to_string())
            .collect();
        assert_eq!(directions, ["Z2->Z1", "Z1->Z2"]);
    }

    #[test]
    fn test_contract_steps_declare_fail_paths() {
        let def = definition().unwrap();
        for step in def.steps.iter().filter(|s| s.requires_fail_states()) {
            assert!(step.on_timeout.is_some(), "{} lacks on_timeout", step.id);
            assert!(step.on_error.is_some(), "{} lacks on_error", step.id);
        }
    }
}
