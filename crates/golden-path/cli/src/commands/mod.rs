//! Subcommands

pub mod audit;
pub mod evaluate;
pub mod list;

use std::path::Path;

use golden_path_catalog::definitions;
use golden_path_types::GoldenPathDefinition;

use crate::error::{read_file, CliResult};

/// Built-in definitions followed by those read from `paths`
pub fn load_definitions(paths: &[String]) -> CliResult<Vec<GoldenPathDefinition>> {
    let mut defs = definitions::builtin()?;
    for path in paths {
        let def = read_definition(path)?;
        def.validate()?;
        tracing::debug!(path = %path, module_code = %def.module_code, "Loaded definition file");
        defs.push(def);
    }
    Ok(defs)
}

/// `.json` is parsed as JSON, anything else as YAML
fn read_definition(path: &str) -> CliResult<GoldenPathDefinition> {
    let raw = read_file(path)?;
    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(serde_json::from_str(&raw)?),
        _ => Ok(serde_yaml::from_str(&raw)?),
    }
}
