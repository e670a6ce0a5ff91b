// crates/civix-cli/src/main.rs
// ============================================================================
// Module: Civix CLI Entry Point
// Description: Command dispatcher for decision evaluation and rule linting.
// Purpose: Evaluate decision requests against a rule library and validate
//          rule files before they reach production traffic.
// Dependencies: civix-core, civix-store-sqlite, clap, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The Civix CLI drives the decision engine from the command line: `decide`
//! evaluates a request JSON against a rule library (SQLite store or JSON
//! rule file) and prints the decision output, and `lint-rules` validates a
//! rule file fail-closed, surfacing definitions that would be rejected at
//! the store boundary. Inputs are untrusted and validated before use.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod config;
#[cfg(test)]
mod main_tests;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use civix_core::DecisionEngine;
use civix_core::DecisionRequest;
use civix_core::EngineError;
use civix_core::MemoryRuleStore;
use civix_core::Outcome;
use civix_core::Rule;
use civix_core::RuleStore;
use civix_core::RuleStoreError;
use civix_store_sqlite::SqliteRuleStore;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use thiserror::Error;

use crate::config::ConfigError;

// ============================================================================
// SECTION: Command Line Surface
// ============================================================================

/// Civix decision engine command line.
#[derive(Debug, Parser)]
#[command(name = "civix", version, about = "Evaluate permit compliance decisions")]
struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Top-level CLI subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate a decision request against a rule library.
    Decide(DecideArgs),
    /// Validate a JSON rule file without evaluating anything.
    LintRules(LintRulesArgs),
}

/// Arguments for the `decide` subcommand.
#[derive(Debug, Args)]
struct DecideArgs {
    /// Path to the decision request JSON, or `-` for stdin.
    #[arg(long)]
    request: PathBuf,
    /// Path to a SQLite rule library.
    #[arg(long, conflicts_with = "rules")]
    store: Option<PathBuf>,
    /// Path to a JSON rule file used instead of a SQLite library.
    #[arg(long)]
    rules: Option<PathBuf>,
    /// Path to the CLI configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Attach the diagnostic trace to the output.
    #[arg(long)]
    debug: bool,
}

/// Arguments for the `lint-rules` subcommand.
#[derive(Debug, Args)]
struct LintRulesArgs {
    /// Path to the JSON rule file to validate.
    #[arg(long)]
    rules: PathBuf,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI errors surfaced to the operator.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
enum CliError {
    /// Configuration loading failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The rule store rejected an open or read.
    #[error(transparent)]
    Store(#[from] RuleStoreError),
    /// The decision engine failed.
    #[error(transparent)]
    Engine(#[from] EngineError),
    /// An input file could not be read.
    #[error("cannot read {path}: {message}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying error message.
        message: String,
    },
    /// An input payload failed to parse.
    #[error("cannot parse {path}: {message}")]
    Parse {
        /// Path that failed to parse.
        path: PathBuf,
        /// Underlying error message.
        message: String,
    },
    /// No rule source was provided by flags or configuration.
    #[error("no rule source: pass --store or --rules, or set store.path in civix.toml")]
    MissingRuleSource,
    /// Writing the output stream failed.
    #[error("cannot write output: {0}")]
    Output(String),
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Process entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Best-effort diagnostics; a failing stderr cannot be reported.
            let _ = writeln!(io::stderr().lock(), "error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Dispatches the parsed command line.
fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Decide(args) => run_decide(&args),
        Command::LintRules(args) => run_lint_rules(&args),
    }
}

// ============================================================================
// SECTION: Decide
// ============================================================================

/// Evaluates a decision request against the configured rule source.
fn run_decide(args: &DecideArgs) -> Result<(), CliError> {
    let mut request = read_request(&args.request)?;
    request.debug = request.debug || args.debug;

    if let Some(rules_path) = &args.rules {
        let store = MemoryRuleStore::new(read_rule_file(rules_path)?);
        return evaluate_and_print(store, &request);
    }

    let store_path = match &args.store {
        Some(path) => path.clone(),
        None => config::load(args.config.as_deref())?
            .store
            .path
            .ok_or(CliError::MissingRuleSource)?,
    };
    let store = SqliteRuleStore::open(&store_path)?;
    evaluate_and_print(store, &request)
}

/// Runs the engine over the given store and prints the decision output.
fn evaluate_and_print<S>(store: S, request: &DecisionRequest) -> Result<(), CliError>
where
    S: RuleStore,
{
    let engine = DecisionEngine::new(store);
    let output = engine.evaluate(request)?;
    let rendered = serde_json::to_string_pretty(&output)
        .map_err(|err| CliError::Output(err.to_string()))?;
    writeln!(io::stdout().lock(), "{rendered}").map_err(|err| CliError::Output(err.to_string()))
}

/// Reads the decision request from a file or stdin.
fn read_request(path: &Path) -> Result<DecisionRequest, CliError> {
    let contents = if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).map_err(|err| CliError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        buffer
    } else {
        read_file(path)?
    };

    serde_json::from_str(&contents).map_err(|err| CliError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

// ============================================================================
// SECTION: Lint Rules
// ============================================================================

/// Validates a JSON rule file and reports per-rule findings.
fn run_lint_rules(args: &LintRulesArgs) -> Result<(), CliError> {
    let rules = read_rule_file(&args.rules)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for rule in &rules {
        writeln!(out, "{}: ok (condition nodes: {})", rule.id, rule.condition.complexity())
            .map_err(|err| CliError::Output(err.to_string()))?;
        let normalized = Outcome::normalize(&rule.outcome);
        if normalized == Outcome::Inconclusive && rule.outcome != "inconclusive" {
            writeln!(
                out,
                "{}: warning: outcome `{}` normalizes to inconclusive",
                rule.id, rule.outcome
            )
            .map_err(|err| CliError::Output(err.to_string()))?;
        }
    }
    writeln!(out, "{} rule(s) validated", rules.len())
        .map_err(|err| CliError::Output(err.to_string()))
}

// ============================================================================
// SECTION: File Helpers
// ============================================================================

/// Reads and parses a JSON rule file.
fn read_rule_file(path: &Path) -> Result<Vec<Rule>, CliError> {
    let contents = read_file(path)?;
    serde_json::from_str(&contents).map_err(|err| CliError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

/// Reads a file to a string with path-carrying errors.
fn read_file(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|err| CliError::Io {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}
