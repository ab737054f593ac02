//! `gp evaluate`: evaluate one definition against a flag map read from JSON

use colored::*;
use golden_path_engine::{GoldenPathEvaluator, GoldenPathSnapshot};
use golden_path_types::{ActionDecision, FlagContext, FlagMap, RouteDecision};
use serde::Serialize;

use crate::error::{read_file, CliError, CliResult};
use crate::output::{mark, print_info, print_json, print_success, OutputFormat};

pub struct EvaluateArgs {
    pub module: String,
    pub flags: String,
    pub route: Option<String>,
    pub action: Option<String>,
    pub definitions: Vec<String>,
    pub format: OutputFormat,
}

#[derive(Debug, Serialize)]
struct Evaluation {
    snapshot: GoldenPathSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    route: Option<RouteDecision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    action: Option<ActionDecision>,
}

pub fn execute(args: EvaluateArgs, evaluator: &GoldenPathEvaluator) -> CliResult<()> {
    let evaluation = evaluate(&args, evaluator)?;
    match args.format {
        OutputFormat::Json => print_json(&evaluation),
        OutputFormat::Text => {
            print_evaluation(&evaluation, &args);
            Ok(())
        }
    }
}

fn evaluate(args: &EvaluateArgs, evaluator: &GoldenPathEvaluator) -> CliResult<Evaluation> {
    let defs = super::load_definitions(&args.definitions)?;
    let def = defs
        .iter()
        .find(|def| def.module_code.as_str() == args.module)
        .ok_or_else(|| CliError::NotFound(format!("golden path '{}'", args.module)))?;

    let flags: FlagMap = serde_json::from_str(&read_file(&args.flags)?)?;
    let context = FlagContext::from_flags(flags);

    let route = args
        .route
        .as_deref()
        .map(|route| evaluator.can_enter_route(def, route, &context));
    let action = args
        .action
        .as_deref()
        .map(|action| evaluator.can_run_action(def, action, &context));

    Ok(Evaluation {
        snapshot: GoldenPathSnapshot::evaluate(evaluator, def, context),
        route,
        action,
    })
}

fn print_evaluation(evaluation: &Evaluation, args: &EvaluateArgs) {
    let snapshot = &evaluation.snapshot;
    println!("{}", snapshot.module_code.to_string().bold());

    for step in &snapshot.steps {
        println!(
            "  {} enter  {} done  {}",
            mark(step.can_enter),
            mark(step.is_complete),
            step.step_id
        );
        if let Some(reason) = &step.blocked_reason {
            println!("      {}", reason.dimmed());
        }
    }
    println!();

    match &snapshot.next_step {
        Some(step) => print_info(&format!("Next step: {}", step)),
        None => print_info("No actionable step"),
    }
    if snapshot.is_completed {
        print_success("Golden path completed");
    }

    if let (Some(route), Some(decision)) = (&args.route, &evaluation.route) {
        match decision {
            RouteDecision::Allowed => println!("Route {}: {}", route, "render".green()),
            RouteDecision::Redirect { target, reason } => println!(
                "Route {}: {} {} ({})",
                route,
                "redirect".yellow(),
                target,
                reason
            ),
        }
    }
    if let (Some(action), Some(decision)) = (&args.action, &evaluation.action) {
        match decision {
            ActionDecision::Allowed => println!("Action {}: {}", action, "allowed".green()),
            ActionDecision::Blocked { reason } => {
                println!("Action {}: {} ({})", action, "blocked".red(), reason)
            }
        }
    }
}
