//! Definition registry: stores and retrieves Golden Path definitions
//!
//! Definitions are validated and frozen on registration. There is exactly
//! one definition per module code; registering a module twice is a wiring
//! error.

use std::collections::HashMap;
use std::sync::Arc;

use golden_path_types::{GoldenPathDefinition, GoldenPathError, GoldenPathResult, ModuleCode};

/// Registry of Golden Path definitions
#[derive(Clone, Debug, Default)]
pub struct DefinitionRegistry {
    /// All registered definitions, keyed by module code
    definitions: HashMap<ModuleCode, Arc<GoldenPathDefinition>>,
    /// Registration order
    order: Vec<ModuleCode>,
}

impl DefinitionRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition
    ///
    /// Validates the definition before storing. Returns its module code.
    pub fn register(&mut self, definition: GoldenPathDefinition) -> GoldenPathResult<ModuleCode> {
        definition.validate()?;

        let module_code = definition.module_code.clone();
        if self.definitions.contains_key(&module_code) {
            return Err(GoldenPathError::DuplicateDefinition(module_code));
        }

        tracing::info!(
            module_code = %module_code,
            version = %definition.version,
            steps = definition.step_count(),
            "Golden path registered"
        );

        self.definitions
            .insert(module_code.clone(), Arc::new(definition));
        self.order.push(module_code.clone());
        Ok(module_code)
    }

    /// Get a definition by module code
    pub fn get(&self, module_code: &ModuleCode) -> GoldenPathResult<Arc<GoldenPathDefinition>> {
        self.find(module_code)
            .ok_or_else(|| GoldenPathError::DefinitionNotFound(module_code.clone()))
    }

    /// Like [`get`](Self::get), but absence is not an error
    pub fn find(&self, module_code: &ModuleCode) -> Option<Arc<GoldenPathDefinition>> {
        self.definitions.get(module_code).cloned()
    }

    /// All definitions in registration order
    pub fn list(&self) -> Vec<Arc<GoldenPathDefinition>> {
        self.order
            .iter()
            .filter_map(|code| self.definitions.get(code).cloned())
            .collect()
    }

    pub fn module_codes(&self) -> &[ModuleCode] {
        &self.order
    }

    /// Total number of registered definitions
    pub fn count(&self) -> usize {
        self.definitions.len()
    }

    pub fn contains(&self, module_code: &ModuleCode) -> bool {
        self.definitions.contains_key(module_code)
    }
}
