//! Built-in Golden Path definitions

use golden_path_types::{GoldenPathDefinition, GoldenPathResult, StepCompletion, StepPrecondition};

pub mod finance_z3;
pub mod manager_lifecycle;
pub mod mod_04;
pub mod pet;

/// Every built-in definition, in registration order
pub fn builtin() -> GoldenPathResult<Vec<GoldenPathDefinition>> {
    Ok(vec![
        mod_04::definition()?,
        finance_z3::definition()?,
        pet::definition()?,
        manager_lifecycle::definition()?,
    ])
}

fn pre(key: &str, source: &str, description: &str) -> StepPrecondition {
    StepPrecondition::new(key, description).from_source(source)
}

fn done(key: &str, source: &str, description: &str) -> StepCompletion {
    StepCompletion::new(key, description).from_source(source)
}
