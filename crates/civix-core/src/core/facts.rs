// crates/civix-core/src/core/facts.rs
// ============================================================================
// Module: Civix Fact Context
// Description: Request-scoped fact space resolved from answers and property fields.
// Purpose: Build the queryable fact maps and resolve condition fact paths.
// Dependencies: crate::core::decision, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The fact context turns a decision request into a queryable fact space.
//! Two maps are built from the answer list: a primary map keyed by question
//! key and a legacy map keyed by question identifier. The legacy map exists
//! only as a fallback for rules authored against old identifiers; the
//! upstream resolver may have injected the identifier as the key in edge
//! cases. Reserved paths expose the request's property fields.
//!
//! Missing facts resolve to `None` without error; downstream comparison
//! semantics treat an unresolved fact as a first-class operand.
//! Invariants:
//! - The context is request-scoped local state, built fresh per call.
//! - Maps are deterministic (`BTreeMap`) and never mutated after build.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde_json::Number;
use serde_json::Value;
use thiserror::Error;

use crate::core::decision::DecisionRequest;

// ============================================================================
// SECTION: Reserved Fact Paths
// ============================================================================

/// Prefix addressing questionnaire answers by question key.
pub const ANSWER_FACT_PREFIX: &str = "answers.";
/// Reserved path resolving to the request's street address.
pub const ADDRESS_FACT: &str = "address";
/// Reserved path resolving to the request's zoning code.
pub const ZONE_CODE_FACT: &str = "zoneCode";

// ============================================================================
// SECTION: Fact Value Boundary
// ============================================================================

/// Errors raised by the fact value construction boundary.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum FactValueError {
    /// The provided number is not finite and cannot enter the fact space.
    #[error("non-finite number is not a valid fact value: {value}")]
    NonFinite {
        /// The rejected floating-point value.
        value: f64,
    },
}

/// Builds a numeric fact value, rejecting non-finite input.
///
/// Fact values parsed from JSON are valid by construction; this boundary
/// exists for programmatic construction from host floats.
///
/// # Errors
///
/// Returns [`FactValueError::NonFinite`] for NaN or infinite input.
pub fn fact_value_from_f64(value: f64) -> Result<Value, FactValueError> {
    Number::from_f64(value).map(Value::Number).ok_or(FactValueError::NonFinite {
        value,
    })
}

// ============================================================================
// SECTION: Fact Context
// ============================================================================

/// Request-scoped fact space queried by the condition evaluator.
///
/// # Invariants
/// - Built fresh per evaluation; never shared across requests.
/// - Duplicate answer keys keep the last answer in list order.
#[derive(Debug, Clone, PartialEq)]
pub struct FactContext {
    /// Primary answer map keyed by question key.
    primary: BTreeMap<String, Value>,
    /// Legacy answer map keyed by question identifier, used only as fallback.
    legacy: BTreeMap<String, Value>,
    /// Street address lifted from the request, when present.
    address: Option<Value>,
    /// Zoning code lifted from the request, when present.
    zone_code: Option<Value>,
}

impl FactContext {
    /// Builds the fact context for one decision request.
    #[must_use]
    pub fn new(request: &DecisionRequest) -> Self {
        let mut primary = BTreeMap::new();
        let mut legacy = BTreeMap::new();
        for answer in &request.answers {
            primary.insert(answer.question_key.clone(), answer.value.clone());
            legacy.insert(answer.question_id.clone(), answer.value.clone());
        }

        Self {
            primary,
            legacy,
            address: request.address.clone().map(Value::String),
            zone_code: request.zone_code.clone().map(Value::String),
        }
    }

    /// Resolves a fact path to its value, or `None` when unresolved.
    ///
    /// Resolution order:
    /// 1. `answers.<key>` strips the prefix, then tries the primary map and
    ///    falls back to the legacy map.
    /// 2. `address` and `zoneCode` resolve to the request's property fields.
    /// 3. Any other path is treated as a bare key against the primary map.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<&Value> {
        if let Some(key) = path.strip_prefix(ANSWER_FACT_PREFIX) {
            return self.primary.get(key).or_else(|| self.legacy.get(key));
        }

        if path == ADDRESS_FACT {
            return self.address.as_ref();
        }

        if path == ZONE_CODE_FACT {
            return self.zone_code.as_ref();
        }

        self.primary.get(path)
    }
}
