// crates/civix-core/src/interfaces/mod.rs
// ============================================================================
// Module: Civix Interfaces
// Description: Backend-agnostic collaborator contracts for rule storage.
// Purpose: Define the read-only rule store surface used by the engine.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how the engine integrates with external systems without
//! embedding backend-specific details. The rule store is the engine's only
//! collaborator: a read-only source of rule records. Implementations must be
//! deterministic for a given store state and fail closed on malformed rule
//! definitions; the read is not transactionally isolated against concurrent
//! rule edits, and the engine requires no consistency beyond whatever the
//! store returned at read time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::FlowId;
use crate::core::JurisdictionId;
use crate::core::Rule;

// ============================================================================
// SECTION: Rule Store
// ============================================================================

/// Rule store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum RuleStoreError {
    /// Store I/O error.
    #[error("rule store io error: {0}")]
    Io(String),
    /// Stored rule definition is malformed or incompatible.
    #[error("rule store invalid rule definition: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("rule store error: {0}")]
    Store(String),
}

/// Read-only source of rule records for the engine.
///
/// Stores should return rules already restricted to the jurisdiction, with
/// flow-scoped rules limited to the requested flow plus the jurisdiction's
/// unscoped rules, ordered by priority descending and creation recency
/// descending. The selector re-applies both the predicate and the ordering,
/// so a store that cannot guarantee either remains usable.
pub trait RuleStore {
    /// Fetches rule records eligible for the jurisdiction and flow.
    ///
    /// # Errors
    ///
    /// Returns [`RuleStoreError`] when rules cannot be read or a stored
    /// definition fails to decode.
    fn fetch_rules(
        &self,
        jurisdiction_id: &JurisdictionId,
        flow_id: &FlowId,
    ) -> Result<Vec<Rule>, RuleStoreError>;
}

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// Rule store over an in-memory rule vector.
///
/// Used for rule libraries loaded from files and for tests. Returns rules
/// in insertion order; predicate filtering and ordering are left to the
/// selector.
#[derive(Debug, Clone, Default)]
pub struct MemoryRuleStore {
    /// Backing rule records in insertion order.
    rules: Vec<Rule>,
}

impl MemoryRuleStore {
    /// Creates a store over the given rules.
    #[must_use]
    pub const fn new(rules: Vec<Rule>) -> Self {
        Self {
            rules,
        }
    }

    /// Returns the number of rules held by the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true when the store holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl RuleStore for MemoryRuleStore {
    fn fetch_rules(
        &self,
        jurisdiction_id: &JurisdictionId,
        flow_id: &FlowId,
    ) -> Result<Vec<Rule>, RuleStoreError> {
        Ok(self
            .rules
            .iter()
            .filter(|rule| {
                rule.jurisdiction_id == *jurisdiction_id
                    && rule.flow_id.as_ref().is_none_or(|rule_flow| rule_flow == flow_id)
            })
            .cloned()
            .collect())
    }
}
