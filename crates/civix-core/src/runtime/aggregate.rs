// crates/civix-core/src/runtime/aggregate.rs
// ============================================================================
// Module: Civix Outcome Aggregator
// Description: Severity fold and metadata collection over matched rules.
// Purpose: Reduce the matched rule set to one outcome plus its supporting
//          citations, reasoning, and recommendations.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The aggregator folds matched rules, in selection order, into a single
//! outcome: the running label is replaced only when a candidate's severity
//! is strictly greater, so the highest severity wins and the earliest rule
//! at the top severity supplies the label on ties. Selection order encodes
//! priority and recency, which is what makes the tie-break deterministic.
//!
//! Independent of which rule wins the label, citations, reasoning, and
//! recommendations are collected from every matched rule in order. An empty
//! matched set is a normal result: `inconclusive` with empty collections.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::Citation;
use crate::core::DecisionOutput;
use crate::core::Outcome;
use crate::core::Rule;
use crate::core::RuleApplication;

// ============================================================================
// SECTION: Aggregation
// ============================================================================

/// Folds matched rules into a decision output without a debug overlay.
///
/// `matched` must be in selection order; the strict-greater severity fold
/// relies on it for tie-breaking.
#[must_use]
pub fn aggregate_matched(matched: &[&Rule]) -> DecisionOutput {
    let mut outcome = Outcome::Inconclusive;
    let mut reasoning = Vec::with_capacity(matched.len());
    let mut citations = Vec::with_capacity(matched.len());
    let mut rules_applied = Vec::with_capacity(matched.len());
    let mut recommendations = Vec::new();

    for rule in matched {
        let candidate = Outcome::normalize(&rule.outcome);
        if candidate.severity() > outcome.severity() {
            outcome = candidate;
        }

        reasoning.push(rule_reasoning(rule));
        citations.push(Citation {
            ordinance_code: rule.ordinance_code.clone(),
            source_url: rule.source_url.clone(),
        });
        rules_applied.push(RuleApplication {
            rule_id: rule.id.clone(),
            name: rule.name.clone(),
            outcome: rule.outcome.clone(),
            priority: rule.priority,
        });
        if let Some(guidance) = &rule.recommendations {
            recommendations.extend(guidance.as_slice().iter().cloned());
        }
    }

    DecisionOutput {
        outcome,
        reasoning,
        citations,
        rules_applied,
        recommendations,
        debug: None,
    }
}

/// Returns the rule's authored reasoning or the templated fallback sentence.
fn rule_reasoning(rule: &Rule) -> String {
    rule.reasoning
        .clone()
        .unwrap_or_else(|| format!("{} applies based on your answers.", rule.name))
}
