//! Golden Path CLI
//!
//! - `gp list`: registered definitions
//! - `gp audit`: consistency audit against the route manifest, for CI
//! - `gp evaluate`: step verdicts and guard decisions for a flag map

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use golden_path_engine::GoldenPathEvaluator;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;
mod error;
mod output;

use commands::audit::AuditArgs;
use commands::evaluate::EvaluateArgs;
use config::CliConfig;
use error::CliResult;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "gp")]
#[command(about = "Golden Path - audit and evaluate workflow definitions", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "GP_CONFIG")]
    config: Option<String>,

    /// Additional definition files (YAML or JSON)
    #[arg(short, long = "definitions", global = true)]
    definitions: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered definitions
    List,

    /// Audit definitions against the route manifest and ledger whitelist
    Audit {
        /// Route manifest (defaults to the bundled one)
        #[arg(short, long)]
        manifest: Option<String>,

        /// Exit with status 1 when the audit reports errors
        #[arg(long)]
        deny_errors: bool,
    },

    /// Evaluate a definition against a flag map
    Evaluate {
        /// Module code of the definition
        #[arg(short, long)]
        module: String,

        /// JSON file with the flag map
        #[arg(long)]
        flags: String,

        /// Route pattern to check
        #[arg(short, long)]
        route: Option<String>,

        /// Action step id to check
        #[arg(short, long)]
        action: Option<String>,
    },
}

fn main() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .init();

    let config = CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::List => commands::list::execute(&cli.definitions, cli.format)?,
        Commands::Audit {
            manifest,
            deny_errors,
        } => {
            let args = AuditArgs {
                manifest,
                definitions: cli.definitions,
                deny_errors,
                format: cli.format,
            };
            if !commands::audit::execute(args, &config.validator)? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Evaluate {
            module,
            flags,
            route,
            action,
        } => {
            let args = EvaluateArgs {
                module,
                flags,
                route,
                action,
                definitions: cli.definitions,
                format: cli.format,
            };
            commands::evaluate::execute(args, &GoldenPathEvaluator::from_config(&config.engine))?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
