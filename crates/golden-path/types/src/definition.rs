//! Golden Path definitions: the declarative description of one workflow
//!
//! A definition is an ordered list of steps plus the ledger events the
//! workflow may emit and the flags that mark it successfully finished.
//!
//! Definitions are registered once at startup and immutable thereafter.

use crate::{GoldenPathError, GoldenPathResult, Step, StepId, StepType};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ── Identifiers ──────────────────────────────────────────────────────

/// Module code, the unique key of a definition (e.g. `MOD-04`)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleCode(pub String);

impl ModuleCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModuleCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ModuleCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

// ── Ledger & Success ─────────────────────────────────────────────────

/// When a declared ledger event is appended
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerTrigger {
    #[default]
    OnComplete,
    OnFail,
}

/// A side-effect record type the workflow may append
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEventDecl {
    pub event_type: String,
    #[serde(default)]
    pub trigger: LedgerTrigger,
}

impl LedgerEventDecl {
    pub fn on_complete(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            trigger: LedgerTrigger::OnComplete,
        }
    }
}

/// Flags that together mark the whole workflow as done
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessState {
    pub required_flags: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

impl SuccessState {
    pub fn new<I, S>(required_flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required_flags: required_flags.into_iter().map(Into::into).collect(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

// ── Definition ───────────────────────────────────────────────────────

/// A Golden Path definition
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoldenPathDefinition {
    pub module_code: ModuleCode,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Steps in declared order
    pub steps: Vec<Step>,
    #[serde(default)]
    pub ledger_events: Vec<LedgerEventDecl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_state: Option<SuccessState>,
    /// Fallback redirect used instead of the engine default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_redirect: Option<String>,
}

impl GoldenPathDefinition {
    pub fn new(module_code: impl Into<String>) -> Self {
        Self {
            module_code: ModuleCode::new(module_code),
            version: String::new(),
            label: String::new(),
            description: String::new(),
            steps: Vec::new(),
            ledger_events: Vec::new(),
            success_state: None,
            failure_redirect: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_success_state(mut self, success_state: SuccessState) -> Self {
        self.success_state = Some(success_state);
        self
    }

    pub fn with_failure_redirect(mut self, route: impl Into<String>) -> Self {
        self.failure_redirect = Some(route.into());
        self
    }

    pub fn with_ledger_event(mut self, event_type: impl Into<String>) -> Self {
        self.ledger_events.push(LedgerEventDecl::on_complete(event_type));
        self
    }

    /// Append a step, rejecting a duplicate id
    pub fn add_step(&mut self, step: Step) -> GoldenPathResult<()> {
        if self.steps.iter().any(|s| s.id == step.id) {
            return Err(GoldenPathError::DuplicateStepId {
                module_code: self.module_code.clone(),
                step_id: step.id,
            });
        }
        self.steps.push(step);
        Ok(())
    }

    /// Builder form of [`add_step`](Self::add_step)
    pub fn with_step(mut self, step: Step) -> GoldenPathResult<Self> {
        self.add_step(step)?;
        Ok(self)
    }

    pub fn get_step(&self, id: &StepId) -> Option<&Step> {
        self.steps.iter().find(|s| &s.id == id)
    }

    /// First step, in declared order, whose route pattern equals `route_pattern`
    pub fn step_for_route(&self, route_pattern: &str) -> Option<&Step> {
        self.steps
            .iter()
            .find(|s| s.route_pattern.as_deref() == Some(route_pattern))
    }

    /// Steps that carry a route pattern
    pub fn route_steps(&self) -> impl Iterator<Item = &Step> {
        self.steps.iter().filter(|s| s.route_pattern.is_some())
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Validate the definition for structural correctness
    pub fn validate(&self) -> GoldenPathResult<()> {
        if self.module_code.0.trim().is_empty() {
            return Err(GoldenPathError::EmptyModuleCode);
        }

        let mut seen_ids = HashSet::new();
        for step in &self.steps {
            if step.id.0.trim().is_empty() {
                return Err(GoldenPathError::EmptyStepId(self.module_code.clone()));
            }
            if !seen_ids.insert(&step.id) {
                return Err(GoldenPathError::DuplicateStepId {
                    module_code: self.module_code.clone(),
                    step_id: step.id.clone(),
                });
            }
            if step.step_type == StepType::Route && step.route_pattern.is_none() {
                return Err(GoldenPathError::MissingRoutePattern {
                    module_code: self.module_code.clone(),
                    step_id: step.id.clone(),
                });
            }
        }

        Ok(())
    }
}
