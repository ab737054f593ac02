//! Audit diagnostics and the accumulated report

use golden_path_types::{ModuleCode, StepId};
use serde::Serialize;

/// How serious a finding is. Errors should block CI, warnings should not.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// The check that produced a diagnostic
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    RouteExistence,
    GuardRegistration,
    LedgerWhitelist,
    ContractDirection,
    FailStateCompleteness,
}

impl std::fmt::Display for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::RouteExistence => "route-existence",
            Self::GuardRegistration => "guard-registration",
            Self::LedgerWhitelist => "ledger-whitelist",
            Self::ContractDirection => "contract-direction",
            Self::FailStateCompleteness => "fail-state",
        };
        write!(f, "{}", name)
    }
}

/// One finding
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub check: Check,
    pub module_code: ModuleCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_id: Option<StepId>,
    pub message: String,
}

impl Diagnostic {
    pub fn error(check: Check, module_code: &ModuleCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            check,
            module_code: module_code.clone(),
            step_id: None,
            message: message.into(),
        }
    }

    pub fn warning(check: Check, module_code: &ModuleCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(check, module_code, message)
        }
    }

    pub fn at_step(mut self, step_id: &StepId) -> Self {
        self.step_id = Some(step_id.clone());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.check, self.module_code)?;
        if let Some(step_id) = &self.step_id {
            write!(f, "/{}", step_id)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// All findings of one audit run
#[derive(Clone, Debug, Default, Serialize)]
pub struct ValidationReport {
    pub definitions_checked: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// No errors. Warnings are allowed.
    pub fn is_clean(&self) -> bool {
        self.error_count() == 0
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    pub fn for_check(&self, check: Check) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.check == check)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Emit every diagnostic at its severity, then a summary line
    pub fn log(&self) {
        for diagnostic in &self.diagnostics {
            let step_id = diagnostic.step_id.as_ref().map(StepId::as_str).unwrap_or("-");
            match diagnostic.severity {
                Severity::Error => tracing::error!(
                    check = %diagnostic.check,
                    module_code = %diagnostic.module_code,
                    step_id,
                    "{}",
                    diagnostic.message
                ),
                Severity::Warning => tracing::warn!(
                    check = %diagnostic.check,
                    module_code = %diagnostic.module_code,
                    step_id,
                    "{}",
                    diagnostic.message
                ),
            }
        }

        tracing::info!(
            definitions = self.definitions_checked,
            errors = self.error_count(),
            warnings = self.warning_count(),
            "Golden path audit finished"
        );
    }
}
