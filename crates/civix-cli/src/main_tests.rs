// crates/civix-cli/src/main_tests.rs
// ============================================================================
// Module: Civix CLI Tests
// Description: Tests for argument parsing, config loading, and file helpers.
// Purpose: Validate the operator-facing surface without spawning processes.
// Dependencies: clap, tempfile
// ============================================================================
//! ## Overview
//! In-process tests for the CLI surface: clap wiring, fail-closed config
//! loading, and rule file parsing.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use clap::Parser;
use tempfile::TempDir;

use crate::Cli;
use crate::Command;
use crate::config;
use crate::config::ConfigError;
use crate::read_rule_file;

// ============================================================================
// SECTION: Argument Parsing
// ============================================================================

/// `decide` parses its flags and stdin marker.
#[test]
fn decide_parses_flags() {
    let cli = Cli::try_parse_from([
        "civix",
        "decide",
        "--request",
        "-",
        "--store",
        "rules.db",
        "--debug",
    ])
    .unwrap();

    match cli.command {
        Command::Decide(args) => {
            assert_eq!(args.request, PathBuf::from("-"));
            assert_eq!(args.store, Some(PathBuf::from("rules.db")));
            assert!(args.rules.is_none());
            assert!(args.debug);
        }
        Command::LintRules(_) => panic!("expected the decide subcommand"),
    }
}

/// `--store` and `--rules` are mutually exclusive.
#[test]
fn decide_rejects_conflicting_rule_sources() {
    let parsed = Cli::try_parse_from([
        "civix",
        "decide",
        "--request",
        "req.json",
        "--store",
        "rules.db",
        "--rules",
        "rules.json",
    ]);
    assert!(parsed.is_err());
}

/// `lint-rules` requires the rule file path.
#[test]
fn lint_rules_requires_path() {
    assert!(Cli::try_parse_from(["civix", "lint-rules"]).is_err());
    let cli = Cli::try_parse_from(["civix", "lint-rules", "--rules", "rules.json"]).unwrap();
    assert!(matches!(cli.command, Command::LintRules(_)));
}

// ============================================================================
// SECTION: Config Loading
// ============================================================================

/// An explicit config path must exist.
#[test]
fn explicit_config_path_fails_closed_when_missing() {
    let result = config::load(Some(Path::new("/nonexistent/civix.toml")));
    assert!(matches!(result, Err(ConfigError::NotFound { .. })));
}

/// A valid config file parses the store section.
#[test]
fn config_parses_store_section() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("civix.toml");
    fs::write(&path, "[store]\npath = \"/var/lib/civix/rules.db\"\n").unwrap();

    let config = config::load(Some(&path)).unwrap();
    assert_eq!(config.store.path, Some(PathBuf::from("/var/lib/civix/rules.db")));
}

/// Unknown keys are rejected rather than ignored.
#[test]
fn config_rejects_unknown_keys() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("civix.toml");
    fs::write(&path, "[store]\npath = \"rules.db\"\nextra = true\n").unwrap();

    let result = config::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}

// ============================================================================
// SECTION: Rule Files
// ============================================================================

/// A rule file parses into rule records.
#[test]
fn rule_file_parses() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.json");
    fs::write(
        &path,
        r#"[{
            "id": "r1",
            "name": "Small lot review",
            "jurisdictionId": "jur-1",
            "flowId": "flow-1",
            "condition": {"type": "and", "conditions": []},
            "outcome": "needs_review",
            "priority": 10
        }]"#,
    )
    .unwrap();

    let rules = read_rule_file(&path).unwrap();
    assert_eq!(rules.len(), 1);
    assert_eq!(rules[0].id.as_str(), "r1");
}

/// A rule file with an operator outside the closed set fails to parse.
#[test]
fn rule_file_with_unknown_operator_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.json");
    fs::write(
        &path,
        r#"[{
            "id": "r1",
            "name": "Bad rule",
            "jurisdictionId": "jur-1",
            "condition": {"type": "comparison", "fact": "x", "operator": "matches"},
            "outcome": "denied",
            "priority": 1
        }]"#,
    )
    .unwrap();

    assert!(read_rule_file(&path).is_err());
}
