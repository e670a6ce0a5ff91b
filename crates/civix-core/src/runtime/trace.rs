// crates/civix-core/src/runtime/trace.rs
// ============================================================================
// Module: Civix Debug Tracer
// Description: Diagnostic overlay partitioning candidates by match result.
// Purpose: Re-evaluate every candidate rule and record match and failure
//          pointers for rule authors.
// Dependencies: crate::core, crate::runtime::evaluator
// ============================================================================

//! ## Overview
//! The tracer is a pure diagnostic overlay: it re-runs the evaluator over
//! every candidate rule (matched or not) and partitions them into matched
//! identifiers and failed rules with failure pointers. Re-running is safe
//! because evaluation is stateless, and it keeps the overlay structurally
//! unable to influence the production outcome.
//! Invariants:
//! - Every candidate appears in exactly one partition.
//! - Partition order follows candidate selection order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::DecisionTrace;
use crate::core::FactContext;
use crate::core::FailedRule;
use crate::core::Rule;
use crate::runtime::evaluator::evaluate_condition;

// ============================================================================
// SECTION: Trace Construction
// ============================================================================

/// Builds the diagnostic trace for a candidate rule set.
#[must_use]
pub fn trace_candidates(candidates: &[Rule], facts: &FactContext) -> DecisionTrace {
    let mut matched_rule_ids = Vec::new();
    let mut failed_rules = Vec::new();

    for rule in candidates {
        let verdict = evaluate_condition(&rule.condition, facts);
        if verdict.matches {
            matched_rule_ids.push(rule.id.clone());
        } else {
            let failed_condition =
                verdict.failed_condition.unwrap_or_else(|| rule.condition.clone());
            failed_rules.push(FailedRule {
                rule_id: rule.id.clone(),
                failed_condition,
            });
        }
    }

    DecisionTrace {
        matched_rule_ids,
        failed_rules,
    }
}
