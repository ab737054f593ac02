//! `gp list`

use colored::*;
use serde::Serialize;

use crate::error::CliResult;
use crate::output::{print_json, OutputFormat};

#[derive(Debug, Serialize)]
struct DefinitionSummary<'a> {
    module_code: &'a str,
    version: &'a str,
    label: &'a str,
    steps: usize,
    has_success_state: bool,
}

pub fn execute(definition_files: &[String], format: OutputFormat) -> CliResult<()> {
    let defs = super::load_definitions(definition_files)?;
    let summaries: Vec<_> = defs
        .iter()
        .map(|def| DefinitionSummary {
            module_code: def.module_code.as_str(),
            version: &def.version,
            label: &def.label,
            steps: def.step_count(),
            has_success_state: def.success_state.is_some(),
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&summaries),
        OutputFormat::Text => {
            for summary in &summaries {
                println!(
                    "{:<16} {:<8} {:>3} steps  {}",
                    summary.module_code.bold(),
                    summary.version.dimmed(),
                    summary.steps,
                    summary.label
                );
            }
            Ok(())
        }
    }
}
