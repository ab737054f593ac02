//! Validator: cross-checks definitions against the route manifest
//!
//! Five independent checks run over every definition and accumulate into a
//! [`ValidationReport`]. Nothing here fails or mutates a definition; the
//! caller decides what to do with the tallies.

use std::collections::{BTreeSet, HashSet};

use golden_path_types::{
    ContractDirection, FailStateKind, GoldenPathDefinition, Step, Zone,
};

use crate::config::ValidatorConfig;
use crate::diagnostics::{Check, Diagnostic, ValidationReport};
use crate::manifest::{normalize_route, RouteManifest};

/// Contract directions that route through the Zone 1 hub
pub const ALLOWED_DIRECTIONS: [ContractDirection; 4] = [
    ContractDirection::new(Zone::Portal, Zone::Admin),
    ContractDirection::new(Zone::Admin, Zone::Portal),
    ContractDirection::new(Zone::Website, Zone::Admin),
    ContractDirection::new(Zone::Admin, Zone::Website),
];

/// Static consistency auditor
#[derive(Clone, Debug)]
pub struct ConsistencyValidator<'a> {
    config: &'a ValidatorConfig,
    manifest: &'a RouteManifest,
    whitelist: HashSet<&'a str>,
    routes: BTreeSet<String>,
}

impl<'a> ConsistencyValidator<'a> {
    pub fn new(
        config: &'a ValidatorConfig,
        manifest: &'a RouteManifest,
        whitelist: &[&'a str],
    ) -> Self {
        Self {
            config,
            manifest,
            whitelist: whitelist.iter().copied().collect(),
            routes: manifest.normalized_routes(&config.route_placeholder),
        }
    }

    /// Audit every definition
    pub fn validate<'d>(
        &self,
        definitions: impl IntoIterator<Item = &'d GoldenPathDefinition>,
    ) -> ValidationReport {
        let mut report = ValidationReport::default();
        for def in definitions {
            self.validate_definition(def, &mut report);
            report.definitions_checked += 1;
        }
        report
    }

    pub fn validate_definition(&self, def: &GoldenPathDefinition, report: &mut ValidationReport) {
        self.check_routes(def, report);
        self.check_guard(def, report);
        self.check_ledger_events(def, report);
        self.check_contracts(def, report);
        self.check_fail_states(def, report);
    }

    fn is_whitelisted(&self, event_type: &str) -> bool {
        self.whitelist.contains(event_type)
    }

    fn check_routes(&self, def: &GoldenPathDefinition, report: &mut ValidationReport) {
        for step in def.route_steps() {
            let Some(pattern) = step.route_pattern.as_deref() else {
                continue;
            };
            let normalized = normalize_route(pattern, &self.config.route_placeholder);
            if self.config.is_exempt(&normalized) || self.routes.contains(&normalized) {
                continue;
            }
            report.push(
                Diagnostic::error(
                    Check::RouteExistence,
                    &def.module_code,
                    format!("Route '{}' is not in the route manifest", pattern),
                )
                .at_step(&step.id),
            );
        }
    }

    fn check_guard(&self, def: &GoldenPathDefinition, report: &mut ValidationReport) {
        if def.route_steps().next().is_none() || self.manifest.has_guard_for(&def.module_code) {
            return;
        }
        report.push(Diagnostic::warning(
            Check::GuardRegistration,
            &def.module_code,
            "Definition has route steps but no guard binding in the route manifest",
        ));
    }

    fn check_ledger_events(&self, def: &GoldenPathDefinition, report: &mut ValidationReport) {
        for event in &def.ledger_events {
            if !self.is_whitelisted(&event.event_type) {
                report.push(Diagnostic::error(
                    Check::LedgerWhitelist,
                    &def.module_code,
                    format!("Ledger event '{}' is not whitelisted", event.event_type),
                ));
            }
        }
    }

    fn check_contracts(&self, def: &GoldenPathDefinition, report: &mut ValidationReport) {
        for step in &def.steps {
            for contract in &step.contract_refs {
                let direction = contract.direction;
                if !ALLOWED_DIRECTIONS.contains(&direction) {
                    let message = if direction.bypasses_hub() {
                        format!(
                            "Contract '{}' uses {} and bypasses the {} hub",
                            contract.key,
                            direction,
                            Zone::HUB
                        )
                    } else {
                        format!(
                            "Contract '{}' uses {}, not an allowed direction",
                            contract.key, direction
                        )
                    };
                    report.push(
                        Diagnostic::error(Check::ContractDirection, &def.module_code, message)
                            .at_step(&step.id),
                    );
                }

                if contract.correlation_keys.is_empty() {
                    report.push(
                        Diagnostic::warning(
                            Check::ContractDirection,
                            &def.module_code,
                            format!("Contract '{}' declares no correlation keys", contract.key),
                        )
                        .at_step(&step.id),
                    );
                }
            }
        }
    }

    fn check_fail_states(&self, def: &GoldenPathDefinition, report: &mut ValidationReport) {
        for step in &def.steps {
            if step.requires_fail_states() {
                for kind in [FailStateKind::Timeout, FailStateKind::Error] {
                    if step.fail_handler(kind).is_none() {
                        report.push(missing_handler(def, step, kind));
                    }
                }
            }

            for (kind, handler) in step.fail_handlers() {
                if !self.is_whitelisted(&handler.ledger_event) {
                    report.push(
                        Diagnostic::error(
                            Check::FailStateCompleteness,
                            &def.module_code,
                            format!(
                                "{} handler references non-whitelisted ledger event '{}'",
                                kind.field_name(),
                                handler.ledger_event
                            ),
                        )
                        .at_step(&step.id),
                    );
                }
            }
        }
    }
}

fn missing_handler(def: &GoldenPathDefinition, step: &Step, kind: FailStateKind) -> Diagnostic {
    let reason = if step.contract_refs.is_empty() {
        "waits for a message"
    } else {
        "has contract references"
    };
    Diagnostic::error(
        Check::FailStateCompleteness,
        &def.module_code,
        format!("Step {} but declares no {}", reason, kind.field_name()),
    )
    .at_step(&step.id)
}

/// Run the audit once at startup and log its findings.
///
/// Returns `None` when the validator is disabled.
pub fn run_startup_audit<'d>(
    config: &ValidatorConfig,
    definitions: impl IntoIterator<Item = &'d GoldenPathDefinition>,
    manifest: &RouteManifest,
    whitelist: &[&str],
) -> Option<ValidationReport> {
    if !config.enabled {
        tracing::debug!("Golden path audit disabled");
        return None;
    }

    let report = ConsistencyValidator::new(config, manifest, whitelist).validate(definitions);
    report.log();
    Some(report)
}
