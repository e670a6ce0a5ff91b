// crates/civix-core/src/core/condition.rs
// ============================================================================
// Module: Civix Condition Trees
// Description: Closed recursive boolean condition language over fact paths.
// Purpose: Define `ConditionNode` and `ComparisonOperator` with stable wire forms.
// Dependencies: serde, serde_json, smallvec
// ============================================================================

//! ## Overview
//! Conditions are finite, acyclic boolean trees authored against fact paths.
//! Both the node kinds and the comparison operators are closed sets: a rule
//! definition using any other kind or operator fails at the deserialization
//! boundary instead of reaching the evaluator, so an incompatible rule
//! library is rejected before it can corrupt compliance outcomes.
//! Invariants:
//! - Wire form is `type`-tagged (`and`, `or`, `not`, `comparison`).
//! - A comparison distinguishes an absent expected value from an explicit
//!   JSON `null` so rules can test for literal null versus a missing fact.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;

// ============================================================================
// SECTION: Comparison Operators
// ============================================================================

/// Comparison operators usable in condition leaves.
///
/// # Invariants
/// - The set is closed; unknown operators are a deserialization error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonOperator {
    /// Structural equality of the resolved fact and the expected value.
    Eq,
    /// Structural inequality of the resolved fact and the expected value.
    Ne,
    /// Numeric greater-than after decimal coercion.
    Gt,
    /// Numeric greater-than-or-equal after decimal coercion.
    Gte,
    /// Numeric less-than after decimal coercion.
    Lt,
    /// Numeric less-than-or-equal after decimal coercion.
    Lte,
    /// Membership of the resolved fact within an expected list.
    In,
    /// Non-membership of the resolved fact within an expected list.
    NotIn,
    /// List or substring containment of the expected value in the fact.
    Contains,
    /// Negated list or substring containment.
    NotContains,
}

// ============================================================================
// SECTION: Condition Nodes
// ============================================================================

/// Inline capacity for composite condition children before heap spill.
const CONDITION_CHILDREN_INLINE: usize = 4;

/// Child list storage for composite condition nodes.
pub type ConditionChildren = SmallVec<[Box<ConditionNode>; CONDITION_CHILDREN_INLINE]>;

/// Recursive boolean condition tree evaluated against a fact context.
///
/// # Invariants
/// - Trees are finite and acyclic by construction.
/// - Node kinds form a closed set; unknown kinds fail deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConditionNode {
    /// Logical AND over the children; an empty list is trivially satisfied.
    And {
        /// Child conditions evaluated left to right.
        conditions: ConditionChildren,
    },
    /// Logical OR over the children; an empty list is trivially unsatisfiable.
    Or {
        /// Child conditions evaluated left to right.
        conditions: ConditionChildren,
    },
    /// Logical NOT of the child condition.
    Not {
        /// The negated child condition.
        condition: Box<ConditionNode>,
    },
    /// Comparison of a resolved fact against an expected value.
    Comparison {
        /// Fact path resolved against the request's fact context.
        fact: String,
        /// Comparison operator to apply.
        operator: ComparisonOperator,
        /// Expected right-hand value. `None` means the field was absent;
        /// `Some(Value::Null)` means an explicit JSON null was authored.
        #[serde(
            default,
            deserialize_with = "deserialize_expected_value",
            skip_serializing_if = "Option::is_none"
        )]
        value: Option<Value>,
    },
}

impl ConditionNode {
    /// Creates a logical AND of the given conditions.
    #[must_use]
    pub fn and(conditions: Vec<Self>) -> Self {
        Self::And {
            conditions: conditions.into_iter().map(Box::new).collect(),
        }
    }

    /// Creates a logical OR of the given conditions.
    #[must_use]
    pub fn or(conditions: Vec<Self>) -> Self {
        Self::Or {
            conditions: conditions.into_iter().map(Box::new).collect(),
        }
    }

    /// Creates a logical NOT of the given condition.
    #[must_use]
    pub fn negate(condition: Self) -> Self {
        Self::Not {
            condition: Box::new(condition),
        }
    }

    /// Creates a comparison leaf.
    #[must_use]
    pub fn comparison(
        fact: impl Into<String>,
        operator: ComparisonOperator,
        value: Option<Value>,
    ) -> Self {
        Self::Comparison {
            fact: fact.into(),
            operator,
            value,
        }
    }

    /// Returns the number of nodes in this condition tree.
    #[must_use]
    pub fn complexity(&self) -> usize {
        match self {
            Self::Comparison {
                ..
            } => 1,
            Self::Not {
                condition,
            } => 1 + condition.complexity(),
            Self::And {
                conditions,
            }
            | Self::Or {
                conditions,
            } => 1 + conditions.iter().map(|child| child.complexity()).sum::<usize>(),
        }
    }

}

// ============================================================================
// SECTION: Serde Helpers
// ============================================================================

/// Deserializes a comparison's expected value, preserving explicit null.
///
/// A present field always produces `Some`, including `"value": null`; the
/// containing struct's `#[serde(default)]` supplies `None` for an absent
/// field.
///
/// # Errors
///
/// Propagates any underlying JSON deserialization error.
fn deserialize_expected_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}
