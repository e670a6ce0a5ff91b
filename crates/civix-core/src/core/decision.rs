// crates/civix-core/src/core/decision.rs
// ============================================================================
// Module: Civix Decision Wire Types
// Description: Decision request and output records exchanged with hosts.
// Purpose: Define the stable camelCase wire surface of the decision engine.
// Dependencies: crate::core::{condition, identifiers, outcome}, serde, serde_json
// ============================================================================

//! ## Overview
//! These records form the external surface of the engine. Requests carry the
//! questionnaire answers plus ambient property fields; outputs carry the
//! aggregate outcome with the citations, reasoning, and recommendations
//! collected from every matched rule, and an optional diagnostic trace.
//! Outputs are computed fresh per call and never mutated after return.
//! Invariants:
//! - Wire form is camelCase (`jurisdictionId`, `rulesApplied`, ...).
//! - `citations` entries keep null fields on the wire for downstream
//!   persistence rather than omitting them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::condition::ConditionNode;
use crate::core::identifiers::FlowId;
use crate::core::identifiers::JurisdictionId;
use crate::core::identifiers::RuleId;
use crate::core::outcome::Outcome;

// ============================================================================
// SECTION: Decision Request
// ============================================================================

/// A resolved questionnaire answer.
///
/// # Invariants
/// - `question_key` and `question_id` are both populated and mutually
///   consistent by the time they reach this engine; the upstream answer
///   resolver guarantees this and failures never surface here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionAnswer {
    /// Canonical question key used by current rule authoring.
    pub question_key: String,
    /// Question identifier retained for rules authored against old
    /// identifiers.
    pub question_id: String,
    /// Answer value within the closed JSON fact grammar.
    pub value: Value,
}

/// A decision evaluation request.
///
/// # Invariants
/// - The engine treats the request as read-only input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    /// Jurisdiction scoping which rules are eligible.
    pub jurisdiction_id: JurisdictionId,
    /// Questionnaire flow the answers were collected under.
    pub flow_id: FlowId,
    /// Resolved questionnaire answers.
    #[serde(default)]
    pub answers: Vec<DecisionAnswer>,
    /// Street address of the property under review, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Zoning code of the property under review, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_code: Option<String>,
    /// Requests the diagnostic trace overlay in the output.
    #[serde(default)]
    pub debug: bool,
}

// ============================================================================
// SECTION: Decision Output
// ============================================================================

/// Citation metadata collected from one matched rule.
///
/// Fields stay on the wire as null when absent so persisted decision rows
/// keep a stable column shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    /// Ordinance code backing the matched rule.
    pub ordinance_code: Option<String>,
    /// Source URL backing the matched rule.
    pub source_url: Option<String>,
}

/// Summary of one matched rule as applied to the decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleApplication {
    /// Identifier of the matched rule.
    pub rule_id: RuleId,
    /// Name of the matched rule.
    pub name: String,
    /// Stored outcome label of the matched rule (not normalized).
    pub outcome: String,
    /// Selection priority of the matched rule.
    pub priority: i64,
}

/// A non-matching candidate rule with its failure pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedRule {
    /// Identifier of the candidate rule that did not match.
    pub rule_id: RuleId,
    /// Most specific condition responsible for the failure.
    pub failed_condition: ConditionNode,
}

/// Diagnostic trace partitioning every candidate rule by match result.
///
/// # Invariants
/// - Every candidate appears exactly once, so
///   `matched_rule_ids.len() + failed_rules.len()` equals the candidate count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionTrace {
    /// Identifiers of candidates whose condition matched, in selection order.
    pub matched_rule_ids: Vec<RuleId>,
    /// Candidates whose condition failed, with failure pointers.
    pub failed_rules: Vec<FailedRule>,
}

/// The aggregate result of one decision evaluation.
///
/// # Invariants
/// - Computed fresh per call; never mutated after return.
/// - Collections are ordered by rule selection order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionOutput {
    /// Aggregate compliance outcome.
    pub outcome: Outcome,
    /// Reasoning sentences from every matched rule.
    pub reasoning: Vec<String>,
    /// Citations from every matched rule.
    pub citations: Vec<Citation>,
    /// Summaries of every matched rule.
    pub rules_applied: Vec<RuleApplication>,
    /// Flattened recommendations from every matched rule.
    pub recommendations: Vec<String>,
    /// Diagnostic trace, present only when the request asked for it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<DecisionTrace>,
}
