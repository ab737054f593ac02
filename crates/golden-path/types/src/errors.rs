//! Error types for the Golden Path layer
//!
//! These are structural errors: programmer mistakes in a definition or in
//! startup wiring. Evaluation itself never fails.

use crate::{ModuleCode, StepId};

/// Errors that can occur while building or registering Golden Paths
#[derive(Debug, thiserror::Error)]
pub enum GoldenPathError {
    #[error("Module code must not be empty")]
    EmptyModuleCode,

    #[error("Step id must not be empty in {0}")]
    EmptyStepId(ModuleCode),

    #[error("Duplicate step id '{step_id}' in {module_code}")]
    DuplicateStepId {
        module_code: ModuleCode,
        step_id: StepId,
    },

    #[error("Route step '{step_id}' in {module_code} has no route pattern")]
    MissingRoutePattern {
        module_code: ModuleCode,
        step_id: StepId,
    },

    #[error("Golden path already registered: {0}")]
    DuplicateDefinition(ModuleCode),

    #[error("Golden path not found: {0}")]
    DefinitionNotFound(ModuleCode),

    #[error("Context resolver already registered: {0}")]
    DuplicateResolver(ModuleCode),

    #[error("Invalid contract direction: {0}")]
    InvalidDirection(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for Golden Path operations
pub type GoldenPathResult<T> = Result<T, GoldenPathError>;
