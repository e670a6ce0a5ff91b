// crates/civix-core/src/runtime/evaluator.rs
// ============================================================================
// Module: Civix Condition Evaluator
// Description: Recursive condition evaluation with failure attribution.
// Purpose: Decide whether a condition tree matches a fact context and, on
//          failure, point at the most specific responsible condition.
// Dependencies: crate::core, bigdecimal, serde_json
// ============================================================================

//! ## Overview
//! The evaluator walks a condition tree against a fact context and returns a
//! [`ConditionVerdict`]: a match flag plus, on failure, a pointer to the
//! most specific condition responsible. Numeric comparison is decimal-aware
//! and deterministic; unresolved facts participate as first-class operands
//! rather than raising errors.
//!
//! Operator semantics preserve two deliberate asymmetries from the rule
//! authoring contract:
//! - `in` and `not_in` both evaluate to `false` when the expected value is
//!   not a list.
//! - `contains` and `not_contains` both evaluate to `false` outside the
//!   list-membership and string-substring cases.
//!
//! Invariants:
//! - `failed_condition` is populated exactly when `matches` is false.
//! - A failing `Not` reports itself, never its inner child.
//! - Evaluation is pure; the same tree and facts always yield the same
//!   verdict.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::str::FromStr;

use bigdecimal::BigDecimal;
use serde_json::Number;
use serde_json::Value;

use crate::core::ComparisonOperator;
use crate::core::ConditionNode;
use crate::core::FactContext;

// ============================================================================
// SECTION: Verdicts
// ============================================================================

/// Result of evaluating one condition tree against a fact context.
///
/// # Invariants
/// - `failed_condition` is `Some` exactly when `matches` is false.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionVerdict {
    /// Whether the condition matched the fact context.
    pub matches: bool,
    /// Most specific condition responsible for a failure.
    pub failed_condition: Option<ConditionNode>,
}

impl ConditionVerdict {
    /// Builds a matching verdict.
    #[must_use]
    pub const fn matched() -> Self {
        Self {
            matches: true,
            failed_condition: None,
        }
    }

    /// Builds a failing verdict pointing at the given condition.
    #[must_use]
    pub const fn failed(condition: ConditionNode) -> Self {
        Self {
            matches: false,
            failed_condition: Some(condition),
        }
    }
}

// ============================================================================
// SECTION: Tree Evaluation
// ============================================================================

/// Evaluates a condition tree against a fact context.
///
/// Composite semantics:
/// - `And` iterates left to right and fails on the first failing child,
///   reporting that child's own failure pointer. An empty `And` matches.
/// - `Or` short-circuits on the first matching child; when none match it
///   reports the leftmost child's failure. An empty `Or` fails and reports
///   itself.
/// - `Not` matches when its child fails; when the child matches, the `Not`
///   node itself is reported, since the failure is a property of the
///   wrapper rather than the child.
#[must_use]
pub fn evaluate_condition(condition: &ConditionNode, facts: &FactContext) -> ConditionVerdict {
    match condition {
        ConditionNode::And {
            conditions,
        } => {
            for child in conditions {
                let verdict = evaluate_condition(child, facts);
                if !verdict.matches {
                    let pointer =
                        verdict.failed_condition.unwrap_or_else(|| (**child).clone());
                    return ConditionVerdict::failed(pointer);
                }
            }
            ConditionVerdict::matched()
        }
        ConditionNode::Or {
            conditions,
        } => {
            let mut first_failure: Option<ConditionNode> = None;
            for child in conditions {
                let verdict = evaluate_condition(child, facts);
                if verdict.matches {
                    return ConditionVerdict::matched();
                }
                if first_failure.is_none() {
                    first_failure =
                        Some(verdict.failed_condition.unwrap_or_else(|| (**child).clone()));
                }
            }
            ConditionVerdict::failed(first_failure.unwrap_or_else(|| condition.clone()))
        }
        ConditionNode::Not {
            condition: child,
        } => {
            if evaluate_condition(child, facts).matches {
                ConditionVerdict::failed(condition.clone())
            } else {
                ConditionVerdict::matched()
            }
        }
        ConditionNode::Comparison {
            fact,
            operator,
            value,
        } => {
            let left = facts.resolve(fact);
            if compare_values(*operator, left, value.as_ref()) {
                ConditionVerdict::matched()
            } else {
                ConditionVerdict::failed(condition.clone())
            }
        }
    }
}

// ============================================================================
// SECTION: Comparison Evaluation
// ============================================================================

/// Applies a comparison operator to a resolved fact and an expected value.
///
/// `left` is `None` when the fact did not resolve; `right` is `None` when
/// the comparison authored no expected value. Both are legitimate operands.
#[must_use]
pub fn compare_values(
    operator: ComparisonOperator,
    left: Option<&Value>,
    right: Option<&Value>,
) -> bool {
    match operator {
        ComparisonOperator::Eq => values_equal(left, right),
        ComparisonOperator::Ne => !values_equal(left, right),
        ComparisonOperator::Gt
        | ComparisonOperator::Gte
        | ComparisonOperator::Lt
        | ComparisonOperator::Lte => compare_ordering(operator, left, right),
        ComparisonOperator::In => compare_in_list(left, right),
        ComparisonOperator::NotIn => compare_not_in_list(left, right),
        ComparisonOperator::Contains => compare_contains(left, right),
        ComparisonOperator::NotContains => compare_not_contains(left, right),
    }
}

/// Structural equality over optional operands.
///
/// Two unresolved operands are equal; an unresolved operand never equals a
/// resolved one, so rules can distinguish a missing fact from explicit null.
fn values_equal(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left, right) {
        (None, None) => true,
        (Some(left_value), Some(right_value)) => value_eq(left_value, right_value),
        _ => false,
    }
}

/// Structural value equality with decimal-aware numeric handling.
fn value_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(left_num), Value::Number(right_num)) => {
            match (decimal_from_number(left_num), decimal_from_number(right_num)) {
                (Some(left_dec), Some(right_dec)) => left_dec == right_dec,
                _ => left_num == right_num,
            }
        }
        _ => left == right,
    }
}

/// Orders two operands after decimal coercion.
///
/// Any operand that does not coerce to a decimal makes the comparison
/// evaluate to `false`, mirroring not-a-number pass-through.
fn compare_ordering(
    operator: ComparisonOperator,
    left: Option<&Value>,
    right: Option<&Value>,
) -> bool {
    let (Some(left_dec), Some(right_dec)) = (coerce_decimal(left), coerce_decimal(right)) else {
        return false;
    };
    let ordering = left_dec.cmp(&right_dec);
    match operator {
        ComparisonOperator::Gt => ordering.is_gt(),
        ComparisonOperator::Gte => ordering.is_ge(),
        ComparisonOperator::Lt => ordering.is_lt(),
        ComparisonOperator::Lte => ordering.is_le(),
        ComparisonOperator::Eq
        | ComparisonOperator::Ne
        | ComparisonOperator::In
        | ComparisonOperator::NotIn
        | ComparisonOperator::Contains
        | ComparisonOperator::NotContains => false,
    }
}

/// Membership of the resolved fact within an expected list.
///
/// A non-list expected value evaluates to `false`.
fn compare_in_list(left: Option<&Value>, right: Option<&Value>) -> bool {
    let Some(Value::Array(items)) = right else {
        return false;
    };
    left.is_some_and(|left_value| list_contains(items, left_value))
}

/// Non-membership of the resolved fact within an expected list.
///
/// A non-list expected value evaluates to `false` here as well; the pair of
/// operators is asymmetric by contract and must stay that way.
fn compare_not_in_list(left: Option<&Value>, right: Option<&Value>) -> bool {
    let Some(Value::Array(items)) = right else {
        return false;
    };
    left.is_none_or(|left_value| !list_contains(items, left_value))
}

/// Containment of the expected value within the resolved fact.
fn compare_contains(left: Option<&Value>, right: Option<&Value>) -> bool {
    match left {
        Some(Value::Array(items)) => {
            right.is_some_and(|right_value| list_contains(items, right_value))
        }
        Some(Value::String(haystack)) => match right {
            Some(Value::String(needle)) => haystack.contains(needle.as_str()),
            _ => false,
        },
        _ => false,
    }
}

/// Negated containment of the expected value within the resolved fact.
///
/// Operand shapes outside the list and string cases evaluate to `false` for
/// both `contains` and `not_contains`.
fn compare_not_contains(left: Option<&Value>, right: Option<&Value>) -> bool {
    match left {
        Some(Value::Array(items)) => {
            right.is_none_or(|right_value| !list_contains(items, right_value))
        }
        Some(Value::String(haystack)) => match right {
            Some(Value::String(needle)) => !haystack.contains(needle.as_str()),
            _ => false,
        },
        _ => false,
    }
}

/// List membership using decimal-aware structural equality.
fn list_contains(items: &[Value], needle: &Value) -> bool {
    items.iter().any(|item| value_eq(item, needle))
}

// ============================================================================
// SECTION: Decimal Coercion
// ============================================================================

/// Coerces an operand to a decimal for ordering comparisons.
///
/// Numbers coerce directly and numeric strings parse; everything else,
/// including unresolved facts, booleans, null, and composites, is
/// not-a-number and yields `None`.
fn coerce_decimal(operand: Option<&Value>) -> Option<BigDecimal> {
    match operand? {
        Value::Number(number) => decimal_from_number(number),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return None;
            }
            BigDecimal::from_str(trimmed).ok()
        }
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Parses a JSON number into `BigDecimal` with a stable string representation.
fn decimal_from_number(number: &Number) -> Option<BigDecimal> {
    let rendered = number.to_string();
    BigDecimal::from_str(&rendered).ok()
}
