//! Derived verdicts. Recomputed on every call, never persisted.

use crate::{Step, StepCompletion, StepPrecondition};
use serde::Serialize;

/// Verdict for one step against one flag context
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StepEvaluation<'a> {
    pub step: &'a Step,
    pub can_enter: bool,
    pub is_complete: bool,
    pub failed_preconditions: Vec<&'a StepPrecondition>,
    pub failed_completions: Vec<&'a StepCompletion>,
}

impl StepEvaluation<'_> {
    /// Enterable but not yet finished
    pub fn is_actionable(&self) -> bool {
        self.can_enter && !self.is_complete
    }

    /// User-facing reason built from the unmet precondition descriptions
    pub fn blocked_reason(&self) -> String {
        join_descriptions(self.failed_preconditions.iter().map(|p| p.description.as_str()))
    }
}

/// Outcome of a route guard check
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum RouteDecision {
    Allowed,
    Redirect {
        /// Deepest reachable checkpoint, or the fallback route
        target: String,
        reason: String,
    },
}

impl RouteDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Outcome of an action guard check
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum ActionDecision {
    Allowed,
    Blocked { reason: String },
}

impl ActionDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Join precondition descriptions into one message
pub fn join_descriptions<'a>(descriptions: impl Iterator<Item = &'a str>) -> String {
    descriptions.collect::<Vec<_>>().join(", ")
}
