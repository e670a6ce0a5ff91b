// crates/civix-core/src/lib.rs
// ============================================================================
// Module: Civix Core Library
// Description: Deterministic permit compliance decision engine.
// Purpose: Derive a single compliance outcome, citations, and a
//          machine-checkable explanation from questionnaire answers and
//          jurisdiction rules.
// Dependencies: bigdecimal, serde, serde_json, smallvec, thiserror
// ============================================================================

//! ## Overview
//! Civix Core evaluates a jurisdiction questionnaire against a library of
//! jurisdiction rules and deterministically derives one compliance outcome
//! with supporting citations, reasoning, and recommendations, plus an
//! optional diagnostic trace explaining why each candidate rule matched or
//! failed.
//!
//! The engine is a pure function of its request plus a single read from a
//! [`RuleStore`]. Conditions form a closed recursive boolean language;
//! outcomes form a closed enumeration with a fixed severity ranking that
//! resolves conflicts among simultaneously matched rules.
//! Invariants:
//! - Evaluation is deterministic and side-effect free.
//! - Unknown condition kinds and operators are rejected at the
//!   deserialization boundary, never defaulted inside the evaluator.
//! - Missing facts resolve to unresolved operands, not errors.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use self::core::ADDRESS_FACT;
pub use self::core::ANSWER_FACT_PREFIX;
pub use self::core::Citation;
pub use self::core::ComparisonOperator;
pub use self::core::ConditionChildren;
pub use self::core::ConditionNode;
pub use self::core::DecisionAnswer;
pub use self::core::DecisionOutput;
pub use self::core::DecisionRequest;
pub use self::core::DecisionTrace;
pub use self::core::FactContext;
pub use self::core::FactValueError;
pub use self::core::FailedRule;
pub use self::core::FlowId;
pub use self::core::JurisdictionId;
pub use self::core::Outcome;
pub use self::core::Recommendations;
pub use self::core::Rule;
pub use self::core::RuleApplication;
pub use self::core::RuleId;
pub use self::core::Timestamp;
pub use self::core::ZONE_CODE_FACT;
pub use self::core::fact_value_from_f64;
pub use self::interfaces::MemoryRuleStore;
pub use self::interfaces::RuleStore;
pub use self::interfaces::RuleStoreError;
pub use self::runtime::ConditionVerdict;
pub use self::runtime::DecisionEngine;
pub use self::runtime::EngineError;
pub use self::runtime::aggregate_matched;
pub use self::runtime::compare_values;
pub use self::runtime::evaluate_condition;
pub use self::runtime::rule_is_candidate;
pub use self::runtime::select_rules;
pub use self::runtime::trace_candidates;
