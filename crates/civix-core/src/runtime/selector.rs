// crates/civix-core/src/runtime/selector.rs
// ============================================================================
// Module: Civix Rule Selector
// Description: Candidate rule retrieval with deterministic ordering.
// Purpose: Apply the selection predicate and the priority/recency ordering
//          contract regardless of store behavior.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! The selector performs the engine's single store read and then enforces
//! the candidate contract locally: a rule is a candidate iff its
//! jurisdiction matches and its flow scope matches or is absent, and
//! candidates order by priority descending with creation recency breaking
//! ties. Stores that already filter and sort are honored; stores that do
//! not are corrected here. The resulting order is load-bearing downstream:
//! it decides aggregation tie-breaks and the debug trace iteration order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::FlowId;
use crate::core::JurisdictionId;
use crate::core::Rule;
use crate::interfaces::RuleStore;
use crate::interfaces::RuleStoreError;

// ============================================================================
// SECTION: Selection
// ============================================================================

/// Returns true when the rule belongs to the candidate set for the request.
#[must_use]
pub fn rule_is_candidate(rule: &Rule, jurisdiction_id: &JurisdictionId, flow_id: &FlowId) -> bool {
    rule.jurisdiction_id == *jurisdiction_id
        && rule.flow_id.as_ref().is_none_or(|rule_flow| rule_flow == flow_id)
}

/// Fetches, filters, and orders the candidate rules for a request.
///
/// Ordering is priority descending, then creation recency descending; the
/// sort is stable, so rules tied on both keys keep store order.
///
/// # Errors
///
/// Returns [`RuleStoreError`] when the store read fails.
pub fn select_rules<S>(
    store: &S,
    jurisdiction_id: &JurisdictionId,
    flow_id: &FlowId,
) -> Result<Vec<Rule>, RuleStoreError>
where
    S: RuleStore + ?Sized,
{
    let mut rules = store.fetch_rules(jurisdiction_id, flow_id)?;
    rules.retain(|rule| rule_is_candidate(rule, jurisdiction_id, flow_id));
    rules.sort_by(|left, right| {
        right
            .priority
            .cmp(&left.priority)
            .then_with(|| right.created_at.cmp(&left.created_at))
    });
    Ok(rules)
}
