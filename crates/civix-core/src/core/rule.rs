// crates/civix-core/src/core/rule.rs
// ============================================================================
// Module: Civix Rule Records
// Description: Jurisdiction rule definitions with citation and guidance metadata.
// Purpose: Model the immutable rule records read from the rule store.
// Dependencies: crate::core::{condition, identifiers, time}, serde
// ============================================================================

//! ## Overview
//! A rule pairs a condition tree with an outcome label, a selection scope
//! (jurisdiction plus optional flow), and the citation and recommendation
//! metadata surfaced to applicants. Rules are immutable for the duration of
//! one evaluation; this engine reads them and never writes them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::condition::ConditionNode;
use crate::core::identifiers::FlowId;
use crate::core::identifiers::JurisdictionId;
use crate::core::identifiers::RuleId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Rule Definition
// ============================================================================

/// A jurisdiction rule: a named, prioritized condition with outcome metadata.
///
/// # Invariants
/// - Immutable during an evaluation; the engine never mutates rule records.
/// - `flow_id` absent means the rule applies to every flow in its jurisdiction.
/// - `outcome` is the stored label; it is normalized to the closed outcome
///   enumeration during aggregation, never here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// Rule identifier assigned by the store.
    pub id: RuleId,
    /// Human-readable rule name.
    pub name: String,
    /// Jurisdiction the rule belongs to.
    pub jurisdiction_id: JurisdictionId,
    /// Optional flow scope; absent applies jurisdiction-wide.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_id: Option<FlowId>,
    /// Condition tree that must match for the rule to apply.
    pub condition: ConditionNode,
    /// Stored outcome label produced when the rule matches.
    pub outcome: String,
    /// Selection priority; higher values order first.
    pub priority: i64,
    /// Creation timestamp used for recency tie-breaking.
    #[serde(default)]
    pub created_at: Timestamp,
    /// Authored explanation surfaced when the rule matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    /// Ordinance code citation, when the rule is backed by one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordinance_code: Option<String>,
    /// Source URL citation, when the rule is backed by one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Applicant guidance attached to the rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Recommendations>,
}

// ============================================================================
// SECTION: Recommendations
// ============================================================================

/// Applicant guidance authored as either one string or a list of strings.
///
/// # Invariants
/// - Wire form is untagged: a bare string or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recommendations {
    /// A single guidance entry.
    One(String),
    /// Multiple guidance entries in authored order.
    Many(Vec<String>),
}

impl Recommendations {
    /// Returns the guidance entries as a slice, regardless of authored shape.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::One(item) => std::slice::from_ref(item),
            Self::Many(items) => items,
        }
    }
}
