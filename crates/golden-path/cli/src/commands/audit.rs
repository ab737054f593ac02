//! `gp audit`

use colored::*;
use golden_path_catalog::{bundled_manifest, LEDGER_EVENT_WHITELIST};
use golden_path_validator::{
    ConsistencyValidator, RouteManifest, Severity, ValidationReport, ValidatorConfig,
};

use crate::error::CliResult;
use crate::output::{print_error, print_json, print_success, print_warning, OutputFormat};

pub struct AuditArgs {
    pub manifest: Option<String>,
    pub definitions: Vec<String>,
    pub deny_errors: bool,
    pub format: OutputFormat,
}

/// Returns `false` when errors were found and `deny_errors` is set
pub fn execute(args: AuditArgs, config: &ValidatorConfig) -> CliResult<bool> {
    let manifest = match &args.manifest {
        Some(path) => RouteManifest::load(path)?,
        None => bundled_manifest()?,
    };
    let defs = super::load_definitions(&args.definitions)?;

    let report = ConsistencyValidator::new(config, &manifest, LEDGER_EVENT_WHITELIST)
        .validate(defs.iter());
    report.log();

    match args.format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => print_report(&report),
    }

    Ok(!(args.deny_errors && report.error_count() > 0))
}

fn print_report(report: &ValidationReport) {
    for diagnostic in &report.diagnostics {
        match diagnostic.severity {
            Severity::Error => print_error(&diagnostic.to_string()),
            Severity::Warning => print_warning(&diagnostic.to_string()),
        }
    }

    let summary = format!(
        "{} definitions checked: {} errors, {} warnings",
        report.definitions_checked,
        report.error_count(),
        report.warning_count()
    );
    if report.is_clean() {
        print_success(&summary);
    } else if report.error_count() > 0 {
        println!("\n{}", summary.red().bold());
    } else {
        println!("\n{}", summary.yellow());
    }
}
