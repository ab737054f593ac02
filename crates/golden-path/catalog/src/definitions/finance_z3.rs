//! GP-FINANCE-Z3: financing request submitted from a Zone 3 website
//!
//! Z3 form → Z1 lead and triage → Z2 finance manager (MOD-11) → bank.
//! Every cross-zone and waiting step declares its timeout and error path.

use golden_path_types::{
    ContractDirection, ContractRef, FailStateHandler, FailStateKind, GoldenPathDefinition,
    GoldenPathResult, RecoveryStrategy, Step, SuccessState, Zone,
};

use super::{done, pre};

pub const MODULE_CODE: &str = "GP-FINANCE-Z3";

pub const TRIAGE_ROUTE: &str = "/admin/finance";
pub const MANAGER_ROUTE: &str = "/portal/finanzierung-manager/:mandateId";

pub const SUCCESS_FLAGS: [&str; 4] = [
    "finance_request_created",
    "lead_created",
    "z1_triaged",
    "manager_assigned",
];

pub fn definition() -> GoldenPathResult<GoldenPathDefinition> {
    GoldenPathDefinition::new(MODULE_CODE)
        .with_version("1.0.0")
        .with_label("Finanzierungseinreichung Zone 3: Vom Websitebesucher zum Bankantrag")
        .with_description(
            "Formulareinreichung via Kaufy/FutureRoom/Landing Page, Lead-Generierung in Z1, \
             Triage, Manager-Zuweisung (MOD-11), Bankeinreichung.",
        )
        .with_ledger_event("finance.z3.request.submitted")
        .with_ledger_event("finance.z3.lead.created")
        .with_ledger_event("finance.z3.dataroom.created")
        .with_ledger_event("finance.z3.email.sent")
        .with_ledger_event("finance.z3.triaged")
        .with_ledger_event("finance.z3.manager.assigned")
        .with_success_state(SuccessState::new(SUCCESS_FLAGS).with_description(
            "Anfrage aus Zone 3 vollstaendig verarbeitet: Lead erstellt, triagiert, Manager zugewiesen.",
        ))
        .with_failure_redirect(TRIAGE_ROUTE)
        // Phase 1: Z3 form → edge function
        .with_step(
            Step::system("z3_form_submit")
                .in_phase(1)
                .with_label("Finanzierungsformular einreichen (Zone 3)")
                .with_contract(
                    ContractRef::new(
                        "CONTRACT_FINANCE_Z3_SUBMIT",
                        ContractDirection::new(Zone::Website, Zone::Admin),
                    )
                    .with_correlation_keys(["finance_request_id", "tenant_id", "public_id"])
                    .with_description("Finanzierungsanfrage wird an Z1 uebermittelt"),
                )
                .with_completion(done(
                    "finance_request_created",
                    "finance_requests",
                    "Finanzierungsanfrage wurde erstellt",
                ))
                .on(
                    FailStateKind::Timeout,
                    FailStateHandler::retry("finance.z3.submit.timeout", 3)
                        .with_status_update("pending")
                        .with_description("Einreichung nicht innerhalb des Zeitfensters bestaetigt"),
                )
                .on(
                    FailStateKind::Error,
                    FailStateHandler::retry("finance.z3.submit.error", 3)
                        .with_status_update("error")
                        .with_description("Technischer Fehler bei der Formulareinreichung"),
                )
                .on(
                    FailStateKind::Duplicate,
                    FailStateHandler::new("finance.z3.submit.duplicate_detected")
                        .with_recovery(RecoveryStrategy::Ignore)
                        .with_status_update("unchanged")
                        .with_description("Gleiche E-Mail und gleiches Objekt bereits eingereicht"),
                ),
        )?
        // Phase 2: automatic follow-up
        .with_step(
            Step::system("create_lead")
                .in_phase(2)
                .with_label("Lead im Z1-Pool erstellen")
                .with_precondition(pre(
                    "finance_request_created",
                    "finance_requests",
                    "Finanzierungsanfrage muss existieren",
                ))
                .with_completion(done("lead_created", "leads", "Lead im Z1-Pool erstellt"))
                .on(
                    FailStateKind::Error,
                    FailStateHandler::retry("finance.z3.lead.create.error", 3)
                        .with_status_update("error")
                        .with_description("Lead-Erstellung fehlgeschlagen"),
                ),
        )?
        .with_step(
            Step::system("create_dataroom")
                .in_phase(2)
                .with_label("Datenraum anlegen")
                .with_precondition(pre(
                    "finance_request_created",
                    "finance_requests",
                    "Finanzierungsanfrage muss existieren",
                ))
                .with_completion(done("dataroom_created", "storage_nodes", "Datenraum-Ordner angelegt"))
                .on(
                    FailStateKind::Error,
                    FailStateHandler::new("finance.z3.dataroom.create.error")
                        .with_recovery(RecoveryStrategy::ManualReview)
                        .with_escalation(Zone::HUB)
                        .with_status_update("warning")
                        .with_description("Datenraum konnte nicht automatisch erstellt werden"),
                ),
        )?
        .with_step(
            Step::system("send_confirmation_email")
                .in_phase(2)
                .with_label("Bestaetigungsmail mit Unterlagenliste senden")
                .with_precondition(pre(
                    "finance_request_created",
                    "finance_requests",
                    "Finanzierungsanfrage muss existieren",
                ))
                .with_completion(done(
                    "confirmation_email_sent",
                    "system_mail_log",
                    "Bestaetigungsmail gesendet",
                ))
                .on(
                    FailStateKind::Error,
                    FailStateHandler::retry("finance.z3.email.send.error", 2)
                        .with_status_update("warning")
                        .with_description("E-Mail-Versand fehlgeschlagen"),
                ),
        )?
        // Phase 3: manual Z1 triage
        .with_step(
            Step::action("z1_triage")
                .in_phase(3)
                .with_label("Z1 Triage: Finanzierungsanfrage pruefen")
                .at_route(TRIAGE_ROUTE)
                .with_sla_hours(24)
                .with_precondition(pre("lead_created", "leads", "Lead muss im Z1-Pool sein"))
                .with_precondition(pre(
                    "finance_request_created",
                    "finance_requests",
                    "Anfrage muss existieren",
                ))
                .with_completion(done("z1_triaged", "finance_requests", "Anfrage wurde triagiert"))
                .on(
                    FailStateKind::Timeout,
                    FailStateHandler::escalate("finance.z3.triage.timeout")
                        .with_status_update("overdue")
                        .with_description("Triage nicht innerhalb SLA durchgefuehrt"),
                ),
        )?
        // Phase 4: Z1 → Z2 assignment
        .with_step(
            Step::action("assign_manager")
                .in_phase(4)
                .with_label("Finanzierungsmanager zuweisen")
                .at_route(TRIAGE_ROUTE)
                .with_sla_hours(48)
                .with_downstream("MOD-11")
                .with_contract(
                    ContractRef::new(
                        "CONTRACT_FINANCE_MANDATE_ASSIGN",
                        ContractDirection::new(Zone::Admin, Zone::Portal),
                    )
                    .with_correlation_keys(["finance_mandate_id", "manager_user_id", "tenant_id"])
                    .with_description("Z1 weist das Mandat einem MOD-11 Manager zu"),
                )
                .with_precondition(pre("z1_triaged", "finance_requests", "Anfrage muss triagiert sein"))
                .with_completion(done(
                    "manager_assigned",
                    "finance_mandates",
                    "Finanzierungsmanager ist zugewiesen",
                ))
                .on(
                    FailStateKind::Timeout,
                    FailStateHandler::escalate("finance.z3.manager.assignment.timeout")
                        .with_status_update("overdue")
                        .with_description("Manager-Zuweisung nicht innerhalb SLA erfolgt"),
                )
                .on(
                    FailStateKind::Rejected,
                    FailStateHandler::new("finance.z3.manager.assignment.rejected")
                        .with_recovery(RecoveryStrategy::ManualReview)
                        .with_status_update("rejected")
                        .with_description("Manager hat das Mandat abgelehnt"),
                )
                .on(
                    FailStateKind::Error,
                    FailStateHandler::retry("finance.z3.manager.assignment.error", 3)
                        .with_status_update("error")
                        .with_description("Technischer Fehler bei der Zuweisung"),
                ),
        )?
        // Phase 5: MOD-11 manager workflow
        .with_step(
            Step::route("manager_processing", MANAGER_ROUTE)
                .in_phase(5)
                .with_label("Finanzierungsakte bearbeiten (MOD-11)")
                .with_precondition(pre(
                    "manager_assigned",
                    "finance_mandates",
                    "Manager muss zugewiesen sein",
                ))
                .with_completion(done(
                    "akte_complete",
                    "finance_requests",
                    "Finanzierungsakte vollstaendig und bankfertig",
                )),
        )?
        // Phase 6: bank submission
        .with_step(
            Step::action("bank_submission")
                .in_phase(6)
                .with_label("Bankeinreichung")
                .with_contract(
                    ContractRef::new(
                        "CONTRACT_FINANCE_BANK_SUBMIT",
                        ContractDirection::new(Zone::Admin, Zone::Portal),
                    )
                    .with_correlation_keys(["finance_request_id", "bank_partner_id"])
                    .with_description("Finanzierungspaket wird an den Bankpartner uebermittelt"),
                )
                .with_precondition(pre("akte_complete", "finance_requests", "Akte muss bankfertig sein"))
                .with_completion(done(
                    "bank_submitted",
                    "finance_requests",
                    "Anfrage wurde bei der Bank eingereicht",
                ))
                .on(
                    FailStateKind::Timeout,
                    FailStateHandler::escalate("finance.z3.bank.submit.timeout")
                        .with_status_update("overdue")
                        .with_description("Keine Rueckmeldung der Bank"),
                )
                .on(
                    FailStateKind::Error,
                    FailStateHandler::new("finance.z3.bank.submit.error")
                        .with_recovery(RecoveryStrategy::ManualReview)
                        .with_escalation(Zone::HUB)
                        .with_status_update("error")
                        .with_description("Bankeinreichung fehlgeschlagen"),
                ),
        )
}
