//! Steps: the ordered units of a Golden Path
//!
//! A step is purely declarative. It names the flags that must be true to
//! enter it and the flags that mark it finished. Steps that cross a zone
//! boundary or wait on an external message also declare what is recorded
//! when they time out or fail.

use crate::{ContractRef, ModuleCode, Zone};
use serde::{Deserialize, Serialize};

// ── Identifiers ──────────────────────────────────────────────────────

/// Identifier of a step, unique within one definition
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StepId(pub String);

impl StepId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    /// A page the user navigates to
    Route,
    /// A user-triggered operation, optionally bound to a page
    Action,
    /// Waiting for an asynchronous message from another zone
    WaitMessage,
    /// Automatic back-office processing
    System,
}

impl StepType {
    /// Route and action steps can serve as redirect checkpoints
    pub fn is_checkpoint_kind(&self) -> bool {
        matches!(self, Self::Route | Self::Action)
    }
}

// ── Conditions ───────────────────────────────────────────────────────

/// A flag that must be true before a step can be entered
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepPrecondition {
    pub key: String,
    /// User-facing explanation, shown when the precondition is unmet
    pub description: String,
    /// Domain table the flag is derived from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl StepPrecondition {
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            source: None,
        }
    }

    pub fn from_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// A flag that must be true for a step to count as finished
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepCompletion {
    pub key: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl StepCompletion {
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            source: None,
        }
    }

    pub fn from_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

// ── Fail States ──────────────────────────────────────────────────────

/// Which fail path a handler covers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailStateKind {
    Timeout,
    Rejected,
    Duplicate,
    Error,
}

impl FailStateKind {
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Timeout => "on_timeout",
            Self::Rejected => "on_rejected",
            Self::Duplicate => "on_duplicate",
            Self::Error => "on_error",
        }
    }
}

impl std::fmt::Display for FailStateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field_name())
    }
}

/// How the surrounding process recovers from a fail state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryStrategy {
    Retry,
    Ignore,
    ManualReview,
    #[serde(rename = "escalate_to_z1")]
    EscalateToHub,
}

/// Declares the ledger record appended on one fail path
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailStateHandler {
    /// Whitelisted ledger event type
    pub ledger_event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_update: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recovery_strategy: Option<RecoveryStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalate_to: Option<Zone>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl FailStateHandler {
    pub fn new(ledger_event: impl Into<String>) -> Self {
        Self {
            ledger_event: ledger_event.into(),
            status_update: None,
            recovery_strategy: None,
            max_retries: None,
            escalate_to: None,
            description: String::new(),
        }
    }

    /// Retry up to `max_retries` times
    pub fn retry(ledger_event: impl Into<String>, max_retries: u32) -> Self {
        Self::new(ledger_event)
            .with_recovery(RecoveryStrategy::Retry)
            .with_max_retries(max_retries)
    }

    /// Hand the instance to the Zone 1 back office
    pub fn escalate(ledger_event: impl Into<String>) -> Self {
        let mut handler = Self::new(ledger_event).with_recovery(RecoveryStrategy::EscalateToHub);
        handler.escalate_to = Some(Zone::HUB);
        handler
    }

    pub fn with_recovery(mut self, strategy: RecoveryStrategy) -> Self {
        self.recovery_strategy = Some(strategy);
        self
    }

    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = Some(max);
        self
    }

    pub fn with_status_update(mut self, status: impl Into<String>) -> Self {
        self.status_update = Some(status.into());
        self
    }

    pub fn with_escalation(mut self, zone: Zone) -> Self {
        self.escalate_to = Some(zone);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

// ── Step ─────────────────────────────────────────────────────────────

/// One step of a Golden Path
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: StepId,
    #[serde(rename = "type")]
    pub step_type: StepType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<u32>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    /// Route the step lives on; matched exactly by the route guard
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route_pattern: Option<String>,
    #[serde(default)]
    pub preconditions: Vec<StepPrecondition>,
    /// An empty list means the step never reports complete
    #[serde(default)]
    pub completion: Vec<StepCompletion>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contract_refs: Vec<ContractRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_timeout: Option<FailStateHandler>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_rejected: Option<FailStateHandler>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_duplicate: Option<FailStateHandler>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_error: Option<FailStateHandler>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sla_hours: Option<u32>,
    /// Modules that pick up the result of this step
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub downstream_modules: Vec<ModuleCode>,
}

impl Step {
    pub fn new(id: impl Into<String>, step_type: StepType) -> Self {
        Self {
            id: StepId::new(id),
            step_type,
            phase: None,
            label: String::new(),
            route_pattern: None,
            preconditions: Vec::new(),
            completion: Vec::new(),
            contract_refs: Vec::new(),
            on_timeout: None,
            on_rejected: None,
            on_duplicate: None,
            on_error: None,
            sla_hours: None,
            downstream_modules: Vec::new(),
        }
    }

    /// A page step bound to `route_pattern`
    pub fn route(id: impl Into<String>, route_pattern: impl Into<String>) -> Self {
        Self::new(id, StepType::Route).at_route(route_pattern)
    }

    pub fn action(id: impl Into<String>) -> Self {
        Self::new(id, StepType::Action)
    }

    pub fn wait_message(id: impl Into<String>) -> Self {
        Self::new(id, StepType::WaitMessage)
    }

    pub fn system(id: impl Into<String>) -> Self {
        Self::new(id, StepType::System)
    }

    pub fn at_route(mut self, route_pattern: impl Into<String>) -> Self {
        self.route_pattern = Some(route_pattern.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn in_phase(mut self, phase: u32) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn with_sla_hours(mut self, hours: u32) -> Self {
        self.sla_hours = Some(hours);
        self
    }

    pub fn requires(mut self, key: impl Into<String>, description: impl Into<String>) -> Self {
        self.preconditions.push(StepPrecondition::new(key, description));
        self
    }

    pub fn with_precondition(mut self, precondition: StepPrecondition) -> Self {
        self.preconditions.push(precondition);
        self
    }

    pub fn completes_when(mut self, key: impl Into<String>, description: impl Into<String>) -> Self {
        self.completion.push(StepCompletion::new(key, description));
        self
    }

    pub fn with_completion(mut self, completion: StepCompletion) -> Self {
        self.completion.push(completion);
        self
    }

    pub fn with_contract(mut self, contract: ContractRef) -> Self {
        self.contract_refs.push(contract);
        self
    }

    pub fn with_downstream(mut self, module_code: impl Into<String>) -> Self {
        self.downstream_modules.push(ModuleCode::new(module_code));
        self
    }

    pub fn on(mut self, kind: FailStateKind, handler: FailStateHandler) -> Self {
        match kind {
            FailStateKind::Timeout => self.on_timeout = Some(handler),
            FailStateKind::Rejected => self.on_rejected = Some(handler),
            FailStateKind::Duplicate => self.on_duplicate = Some(handler),
            FailStateKind::Error => self.on_error = Some(handler),
        }
        self
    }

    pub fn fail_handler(&self, kind: FailStateKind) -> Option<&FailStateHandler> {
        match kind {
            FailStateKind::Timeout => self.on_timeout.as_ref(),
            FailStateKind::Rejected => self.on_rejected.as_ref(),
            FailStateKind::Duplicate => self.on_duplicate.as_ref(),
            FailStateKind::Error => self.on_error.as_ref(),
        }
    }

    /// All declared fail-state handlers, in field order
    pub fn fail_handlers(&self) -> impl Iterator<Item = (FailStateKind, &FailStateHandler)> {
        [
            FailStateKind::Timeout,
            FailStateKind::Rejected,
            FailStateKind::Duplicate,
            FailStateKind::Error,
        ]
        .into_iter()
        .filter_map(move |kind| self.fail_handler(kind).map(|handler| (kind, handler)))
    }

    /// Cross-zone and message-wait steps must declare timeout and error handlers
    pub fn requires_fail_states(&self) -> bool {
        !self.contract_refs.is_empty() || self.step_type == StepType::WaitMessage
    }

    /// Route/action step with a route: a valid redirect target
    pub fn is_checkpoint(&self) -> bool {
        self.step_type.is_checkpoint_kind() && self.route_pattern.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ContractDirection, Zone};

    #[test]
    fn test_builder() {
        let step = Step::route("edit_dossier", "/portal/immobilien/:id")
            .with_label("Edit dossier")
            .in_phase(2)
            .requires("property_exists", "Property must exist");

        assert_eq!(step.id, StepId::new("edit_dossier"));
        assert_eq!(step.step_type, StepType::Route);
        assert_eq!(step.route_pattern.as_deref(), Some("/portal/immobilien/:id"));
        assert_eq!(step.preconditions.len(), 1);
        assert!(step.completion.is_empty());
        assert!(step.is_checkpoint());
    }

    #[test]
    fn test_system_step_is_not_checkpoint() {
        let step = Step::system("mod05_visibility").at_route("/portal/mietverwaltung");
        assert!(!step.is_checkpoint());
    }

    #[test]
    fn test_action_without_route_is_not_checkpoint() {
        assert!(!Step::action("bank_submission").is_checkpoint());
    }

    #[test]
    fn test_requires_fail_states() {
        assert!(!Step::action("plain").requires_fail_states());
        assert!(Step::wait_message("await_reply").requires_fail_states());

        let crossing = Step::action("assign").with_contract(ContractRef::new(
            "CONTRACT_ASSIGN",
            ContractDirection::new(Zone::Admin, Zone::Portal),
        ));
        assert!(crossing.requires_fail_states());
    }

    #[test]
    fn test_fail_handlers_iteration_order() {
        let step = Step::action("assign")
            .on(FailStateKind::Error, FailStateHandler::new("x.error"))
            .on(FailStateKind::Timeout, FailStateHandler::escalate("x.timeout"));

        let kinds: Vec<_> = step.fail_handlers().map(|(kind, _)| kind).collect();
        assert_eq!(kinds, vec![FailStateKind::Timeout, FailStateKind::Error]);

        let timeout = step.fail_handler(FailStateKind::Timeout).unwrap();
        assert_eq!(timeout.escalate_to, Some(Zone::Admin));
        assert_eq!(timeout.recovery_strategy, Some(RecoveryStrategy::EscalateToHub));
    }

    #[test]
    fn test_step_serde_shape() {
        let json = r#"{
            "id": "z1_triage",
            "type": "action",
            "route_pattern": "/admin/finance",
            "preconditions": [{"key": "lead_created", "description": "Lead must exist"}],
            "on_timeout": {"ledger_event": "finance.z3.triage.timeout", "recovery_strategy": "escalate_to_z1"}
        }"#;
        let step: Step = serde_json::from_str(json).unwrap();
        assert_eq!(step.step_type, StepType::Action);
        assert!(step.completion.is_empty());
        assert_eq!(
            step.on_timeout.unwrap().recovery_strategy,
            Some(RecoveryStrategy::EscalateToHub)
        );
    }

    #[test]
    fn test_wait_message_serde_name() {
        let step: Step = serde_json::from_str(r#"{"id": "w", "type": "wait_message"}"#).unwrap();
        assert_eq!(step.step_type, StepType::WaitMessage);
    }
}
