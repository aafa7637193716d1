/// Rules Linter — validates a rule file against a response file.
///
/// Usage: rules_linter [--rules <file.ron>] [--responses <file.ron>] [--strict]
///
/// Either file defaults to the builtin persona. Exits non-zero on errors,
/// or on warnings when `--strict` is given.
use clap::Parser;
use rulechat::builtin;
use rulechat::core::pool::ResponsePool;
use rulechat::core::rules::PatternRuleSet;
use rulechat::core::session::validate;
use rulechat::schema::intent::Intent;
use std::path::PathBuf;
use std::process;

#[derive(Debug, Parser)]
#[command(name = "rules_linter", version, about = "Lint chatbot rule and response files")]
struct Args {
    /// RON file with the ordered pattern rules
    #[arg(long)]
    rules: Option<PathBuf>,

    /// RON file with the response pools
    #[arg(long)]
    responses: Option<PathBuf>,

    /// Treat warnings as errors
    #[arg(long)]
    strict: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let rules = match args.rules {
        Some(ref path) => PatternRuleSet::load_from_ron(path),
        None => builtin::rules(),
    }
    .unwrap_or_else(|e| {
        eprintln!("ERROR: Failed to load rules: {}", e);
        process::exit(1);
    });

    let responses = match args.responses {
        Some(ref path) => ResponsePool::load_from_ron(path),
        None => builtin::responses(),
    }
    .unwrap_or_else(|e| {
        eprintln!("ERROR: Failed to load responses: {}", e);
        process::exit(1);
    });

    println!(
        "Loaded {} rules and {} response pools",
        rules.len(),
        responses.intents().count()
    );

    let (errors, warnings) = lint(&rules, &responses);

    println!("\n=== Rules Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if !errors.is_empty() || (args.strict && !warnings.is_empty()) {
        process::exit(1);
    }
}

fn lint(rules: &PatternRuleSet, responses: &ResponsePool) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if let Err(e) = validate(rules, responses, true, false) {
        errors.push(e.to_string());
    }

    let targets = rules.targets();
    for intent in Intent::ALL {
        if intent.is_default() {
            continue;
        }
        if !targets.contains(&intent) {
            if responses.contains(intent) {
                warnings.push(format!(
                    "'{}' has replies but no rule targets it",
                    intent
                ));
            } else {
                warnings.push(format!("'{}' is never used", intent));
            }
        }
    }

    for (index, keyword) in rules.shadowed_keywords() {
        warnings.push(format!(
            "rule {} keyword '{}' is shadowed by an earlier rule",
            index, keyword
        ));
    }

    for (intent, reply) in responses.duplicate_replies() {
        warnings.push(format!("duplicate reply in '{}': \"{}\"", intent, reply));
    }

    (errors, warnings)
}
