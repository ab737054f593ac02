//! Ledger event types the platform accepts

/// Every event type a built-in Golden Path may append to the ledger
pub const LEDGER_EVENT_WHITELIST: &[&str] = &[
    // GP-FINANCE-Z3
    "finance.z3.request.submitted",
    "finance.z3.lead.created",
    "finance.z3.dataroom.created",
    "finance.z3.email.sent",
    "finance.z3.triaged",
    "finance.z3.manager.assigned",
    "finance.z3.submit.timeout",
    "finance.z3.submit.error",
    "finance.z3.submit.duplicate_detected",
    "finance.z3.lead.create.error",
    "finance.z3.dataroom.create.error",
    "finance.z3.email.send.error",
    "finance.z3.triage.timeout",
    "finance.z3.manager.assignment.timeout",
    "finance.z3.manager.assignment.rejected",
    "finance.z3.manager.assignment.error",
    "finance.z3.bank.submit.timeout",
    "finance.z3.bank.submit.error",
    // GP-PET
    "pet.lead.captured",
    "pet.z1.profile.created",
    "pet.customer.created",
    "pet.customer.assigned",
    "pet.mod05.linked",
    "pet.booking.first_completed",
    "pet.lead.capture.timeout",
    "pet.lead.capture.duplicate_detected",
    "pet.lead.capture.error",
    "pet.z1.profile.create.error",
    "pet.customer.assign.timeout",
    "pet.customer.assign.rejected",
    "pet.customer.assign.error",
    // GP-MANAGER-LIFECYCLE
    "manager.application.submitted",
    "manager.application.approved",
    "manager.org.upgraded",
    "manager.tiles.activated",
    "manager.first_client.assigned",
    "manager.application.submit.timeout",
    "manager.application.submit.error",
    "manager.qualification.check.timeout",
    "manager.application.rejected",
    "manager.org.upgrade.error",
    "manager.tiles.activation.error",
    "manager.first_client.assignment.timeout",
    "manager.first_client.assignment.error",
    "manager.delegation.grant.error",
];

pub fn is_whitelisted(event_type: &str) -> bool {
    LEDGER_EVENT_WHITELIST.contains(&event_type)
}
