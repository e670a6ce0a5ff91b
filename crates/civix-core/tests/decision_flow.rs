// crates/civix-core/tests/decision_flow.rs
// ============================================================================
// Module: Decision Flow Tests
// Description: End-to-end engine tests over an in-memory rule store.
// Purpose: Validate selection, aggregation, tie-breaking, and the debug
//          trace overlay.
// Dependencies: civix_core
// ============================================================================
//! ## Overview
//! Drives the full engine: candidate selection and ordering, the severity
//! fold with its strict-greater tie-break, per-rule metadata collection, and
//! the diagnostic trace partition.

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

mod support;

use civix_core::ComparisonOperator;
use civix_core::ConditionNode;
use civix_core::DecisionAnswer;
use civix_core::DecisionEngine;
use civix_core::DecisionRequest;
use civix_core::FlowId;
use civix_core::JurisdictionId;
use civix_core::MemoryRuleStore;
use civix_core::Outcome;
use civix_core::Recommendations;
use civix_core::Rule;
use civix_core::RuleId;
use civix_core::Timestamp;
use serde_json::json;
use support::TestResult;
use support::ensure;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Builds a rule scoped to the test jurisdiction and flow.
fn rule(id: &str, priority: i64, outcome: &str, condition: ConditionNode) -> Rule {
    Rule {
        id: RuleId::new(id),
        name: format!("Rule {id}"),
        jurisdiction_id: JurisdictionId::new("jur-1"),
        flow_id: Some(FlowId::new("flow-1")),
        condition,
        outcome: outcome.to_string(),
        priority,
        created_at: Timestamp::from_unix_millis(0),
        reasoning: None,
        ordinance_code: None,
        source_url: None,
        recommendations: None,
    }
}

/// Builds the small-lot review rule used by the concrete scenarios.
fn small_lot_rule() -> Rule {
    rule(
        "r1",
        10,
        "needs_review",
        ConditionNode::and(vec![
            ConditionNode::comparison(
                "answers.lot_size",
                ComparisonOperator::Lt,
                Some(json!(4000)),
            ),
            ConditionNode::comparison("zoneCode", ComparisonOperator::Eq, Some(json!("SF-4"))),
        ]),
    )
}

/// Builds a request with a lot size answer and property fields.
fn request(lot_size: i64) -> DecisionRequest {
    DecisionRequest {
        jurisdiction_id: JurisdictionId::new("jur-1"),
        flow_id: FlowId::new("flow-1"),
        answers: vec![DecisionAnswer {
            question_key: "lot_size".to_string(),
            question_id: "q_lot_size_v1".to_string(),
            value: json!(lot_size),
        }],
        address: Some("123 Historic District Way".to_string()),
        zone_code: Some("SF-4".to_string()),
        debug: false,
    }
}

// ============================================================================
// SECTION: Concrete Scenarios
// ============================================================================

/// Small lot in the scoped zone triggers review.
#[test]
fn small_lot_in_zone_needs_review() -> TestResult {
    let engine = DecisionEngine::new(MemoryRuleStore::new(vec![small_lot_rule()]));
    let output = engine.evaluate(&request(3500))?;

    ensure(output.outcome == Outcome::NeedsReview, "expected needs_review")?;
    ensure(output.rules_applied.len() == 1, "exactly one rule applies")?;
    ensure(
        output.rules_applied[0].rule_id == RuleId::new("r1"),
        "the small-lot rule must be recorded",
    )
}

/// A large lot fails the first comparison and nothing applies.
#[test]
fn large_lot_is_inconclusive_with_empty_collections() -> TestResult {
    let engine = DecisionEngine::new(MemoryRuleStore::new(vec![small_lot_rule()]));
    let mut input = request(5000);
    input.debug = true;
    let output = engine.evaluate(&input)?;

    ensure(output.outcome == Outcome::Inconclusive, "no matched rules means inconclusive")?;
    ensure(output.reasoning.is_empty(), "no reasoning collected")?;
    ensure(output.citations.is_empty(), "no citations collected")?;
    ensure(output.rules_applied.is_empty(), "no rules applied")?;
    ensure(output.recommendations.is_empty(), "no recommendations collected")?;

    let trace = output.debug.ok_or("expected a debug trace")?;
    let expected_failure =
        ConditionNode::comparison("answers.lot_size", ComparisonOperator::Lt, Some(json!(4000)));
    ensure(trace.failed_rules.len() == 1, "the only candidate failed")?;
    ensure(
        trace.failed_rules[0].failed_condition == expected_failure,
        "the failure pointer is the first failing comparison",
    )
}

/// A low-priority denial outranks a high-priority review by severity.
#[test]
fn higher_severity_wins_despite_lower_priority() -> TestResult {
    let historic_rule = rule(
        "r2",
        1,
        "denied",
        ConditionNode::comparison(
            "address",
            ComparisonOperator::Contains,
            Some(json!("Historic")),
        ),
    );
    let engine =
        DecisionEngine::new(MemoryRuleStore::new(vec![small_lot_rule(), historic_rule]));
    let output = engine.evaluate(&request(3500))?;

    ensure(output.outcome == Outcome::Denied, "severity 3 beats severity 2")?;
    ensure(output.rules_applied.len() == 2, "both matched rules are recorded")?;
    ensure(
        output.rules_applied[0].rule_id == RuleId::new("r1"),
        "selection order lists the higher priority rule first",
    )
}

// ============================================================================
// SECTION: Aggregation
// ============================================================================

/// Denied wins over approved in either selection order.
#[test]
fn denied_beats_approved_in_any_order() -> TestResult {
    let always = || ConditionNode::and(vec![]);
    for (first_outcome, second_outcome) in [("denied", "approved"), ("approved", "denied")] {
        let engine = DecisionEngine::new(MemoryRuleStore::new(vec![
            rule("a", 10, first_outcome, always()),
            rule("b", 5, second_outcome, always()),
        ]));
        let output = engine.evaluate(&request(3500))?;
        ensure(output.outcome == Outcome::Denied, "denied always wins the fold")?;
    }
    Ok(())
}

/// The earliest rule at the top severity supplies the label on ties.
#[test]
fn severity_tie_keeps_earliest_label() -> TestResult {
    let always = || ConditionNode::and(vec![]);
    let engine = DecisionEngine::new(MemoryRuleStore::new(vec![
        rule("high", 10, "conditional", always()),
        rule("low", 5, "needs_review", always()),
    ]));
    let output = engine.evaluate(&request(3500))?;
    ensure(
        output.outcome == Outcome::Conditional,
        "the priority-10 rule wins the severity tie",
    )?;

    let engine = DecisionEngine::new(MemoryRuleStore::new(vec![
        rule("high", 10, "needs_review", always()),
        rule("low", 5, "conditional", always()),
    ]));
    let output = engine.evaluate(&request(3500))?;
    ensure(
        output.outcome == Outcome::NeedsReview,
        "swapping priorities swaps the tie-break winner",
    )
}

/// On a priority tie, the more recently created rule wins.
#[test]
fn priority_tie_breaks_on_recency() -> TestResult {
    let always = || ConditionNode::and(vec![]);
    let mut older = rule("older", 10, "needs_review", always());
    older.created_at = Timestamp::from_unix_millis(1_000);
    let mut newer = rule("newer", 10, "conditional", always());
    newer.created_at = Timestamp::from_unix_millis(2_000);

    let engine = DecisionEngine::new(MemoryRuleStore::new(vec![older, newer]));
    let output = engine.evaluate(&request(3500))?;
    ensure(
        output.outcome == Outcome::Conditional,
        "the newer rule orders first and wins the severity tie",
    )?;
    ensure(
        output.rules_applied[0].rule_id == RuleId::new("newer"),
        "recency ordering is visible in rules_applied",
    )
}

/// Collections come from every matched rule, not only the winner.
#[test]
fn collections_come_from_every_matched_rule() -> TestResult {
    let always = || ConditionNode::and(vec![]);
    let mut first = rule("first", 10, "needs_review", always());
    first.reasoning = Some("Lot is below the minimum size.".to_string());
    first.ordinance_code = Some("23-4B".to_string());
    first.recommendations = Some(Recommendations::One("Request a variance.".to_string()));
    let mut second = rule("second", 5, "needs_review", always());
    second.source_url = Some("https://example.gov/ordinances/23-4".to_string());
    second.recommendations = Some(Recommendations::Many(vec![
        "Confirm the survey.".to_string(),
        "Contact the planning office.".to_string(),
    ]));

    let engine = DecisionEngine::new(MemoryRuleStore::new(vec![first, second]));
    let output = engine.evaluate(&request(3500))?;

    ensure(output.outcome == Outcome::NeedsReview, "shared severity keeps the label")?;
    ensure(output.citations.len() == 2, "citations from both rules")?;
    ensure(
        output.citations[0].ordinance_code.as_deref() == Some("23-4B"),
        "first citation carries the ordinance code",
    )?;
    ensure(
        output.citations[1].source_url.as_deref()
            == Some("https://example.gov/ordinances/23-4"),
        "second citation carries the source url",
    )?;
    ensure(
        output.reasoning
            == vec![
                "Lot is below the minimum size.".to_string(),
                "Rule second applies based on your answers.".to_string(),
            ],
        "authored reasoning is kept and the fallback sentence fills gaps",
    )?;
    ensure(output.recommendations.len() == 3, "recommendations flatten from both rules")
}

/// Unrecognized stored outcome labels normalize to inconclusive.
#[test]
fn unrecognized_outcome_normalizes_to_inconclusive() -> TestResult {
    let always = || ConditionNode::and(vec![]);
    let engine = DecisionEngine::new(MemoryRuleStore::new(vec![
        rule("odd", 10, "PROHIBITED", always()),
        rule("ok", 5, "approved", always()),
    ]));
    let output = engine.evaluate(&request(3500))?;
    ensure(
        output.outcome == Outcome::Approved,
        "a normalized-inconclusive label never outranks approved",
    )?;
    ensure(
        output.rules_applied[0].outcome == "PROHIBITED",
        "rules_applied keeps the stored label verbatim",
    )
}

// ============================================================================
// SECTION: Selection
// ============================================================================

/// Flow-scoped and jurisdiction-wide rules are candidates; others are not.
#[test]
fn selection_predicate_scopes_candidates() -> TestResult {
    let always = || ConditionNode::and(vec![]);
    let mut global = rule("global", 1, "approved", always());
    global.flow_id = None;
    let mut other_flow = rule("other-flow", 1, "denied", always());
    other_flow.flow_id = Some(FlowId::new("flow-2"));
    let mut other_jurisdiction = rule("other-jur", 1, "denied", always());
    other_jurisdiction.jurisdiction_id = JurisdictionId::new("jur-2");

    let engine = DecisionEngine::new(MemoryRuleStore::new(vec![
        global,
        other_flow,
        other_jurisdiction,
        rule("scoped", 2, "needs_review", always()),
    ]));
    let mut input = request(3500);
    input.debug = true;
    let output = engine.evaluate(&input)?;

    ensure(output.outcome == Outcome::NeedsReview, "scoped and global rules both match")?;
    ensure(output.rules_applied.len() == 2, "only in-scope rules are candidates")?;
    let trace = output.debug.ok_or("expected a debug trace")?;
    ensure(
        trace.matched_rule_ids == vec![RuleId::new("scoped"), RuleId::new("global")],
        "trace follows selection order over in-scope candidates",
    )
}

/// A rule authored against a legacy question identifier still matches.
#[test]
fn legacy_authored_rule_still_matches() -> TestResult {
    let legacy_rule = rule(
        "legacy",
        1,
        "conditional",
        ConditionNode::comparison(
            "answers.q_lot_size_v1",
            ComparisonOperator::Lt,
            Some(json!(4000)),
        ),
    );
    let engine = DecisionEngine::new(MemoryRuleStore::new(vec![legacy_rule]));
    let output = engine.evaluate(&request(3500))?;
    ensure(
        output.outcome == Outcome::Conditional,
        "the legacy identifier resolves through the fallback map",
    )
}

/// An empty store yields a normal inconclusive result.
#[test]
fn empty_store_is_inconclusive() -> TestResult {
    let engine = DecisionEngine::new(MemoryRuleStore::default());
    let output = engine.evaluate(&request(3500))?;
    ensure(output.outcome == Outcome::Inconclusive, "no candidates is not an error")?;
    ensure(output.rules_applied.is_empty(), "collections stay empty")
}

// ============================================================================
// SECTION: Debug Trace
// ============================================================================

/// The trace partitions every candidate exactly once.
#[test]
fn trace_partitions_all_candidates() -> TestResult {
    let candidates = vec![
        small_lot_rule(),
        rule(
            "r2",
            1,
            "denied",
            ConditionNode::comparison(
                "address",
                ComparisonOperator::Contains,
                Some(json!("Historic")),
            ),
        ),
        rule(
            "r3",
            0,
            "approved",
            ConditionNode::comparison(
                "answers.lot_size",
                ComparisonOperator::Gt,
                Some(json!(10_000)),
            ),
        ),
    ];
    let candidate_count = candidates.len();
    let engine = DecisionEngine::new(MemoryRuleStore::new(candidates));

    let mut input = request(3500);
    input.debug = true;
    let output = engine.evaluate(&input)?;

    let trace = output.debug.ok_or("expected a debug trace")?;
    ensure(
        trace.matched_rule_ids.len() + trace.failed_rules.len() == candidate_count,
        "every candidate lands in exactly one partition",
    )?;
    ensure(
        trace.matched_rule_ids == vec![RuleId::new("r1"), RuleId::new("r2")],
        "matched ids follow selection order",
    )?;
    ensure(
        trace.failed_rules[0].rule_id == RuleId::new("r3"),
        "the non-matching candidate is reported with its failure",
    )
}

/// The trace is absent unless requested and never changes the outcome.
#[test]
fn trace_is_opt_in_and_outcome_neutral() -> TestResult {
    let engine = DecisionEngine::new(MemoryRuleStore::new(vec![small_lot_rule()]));

    let plain = engine.evaluate(&request(3500))?;
    ensure(plain.debug.is_none(), "no trace unless requested")?;

    let mut input = request(3500);
    input.debug = true;
    let traced = engine.evaluate(&input)?;
    ensure(traced.debug.is_some(), "trace present when requested")?;
    ensure(
        plain.outcome == traced.outcome && plain.rules_applied == traced.rules_applied,
        "the trace overlay never influences the production outcome",
    )
}
