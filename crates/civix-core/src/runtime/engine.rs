// crates/civix-core/src/runtime/engine.rs
// ============================================================================
// Module: Civix Decision Engine
// Description: Request orchestration over facts, selection, and aggregation.
// Purpose: Wire the fact context, rule selector, condition evaluator,
//          aggregator, and optional tracer into one evaluation.
// Dependencies: crate::core, crate::interfaces, crate::runtime, thiserror
// ============================================================================

//! ## Overview
//! The engine is a pure function of its request plus one read from the rule
//! store. It holds no mutable state, so concurrent evaluations never
//! interfere and need no locks, retries, or timeouts of its own; callers
//! needing a deadline impose it around the store read. A rule is wholly
//! matched or wholly not matched; there is no partial application.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::DecisionOutput;
use crate::core::DecisionRequest;
use crate::core::FactContext;
use crate::core::Rule;
use crate::interfaces::RuleStore;
use crate::interfaces::RuleStoreError;
use crate::runtime::aggregate::aggregate_matched;
use crate::runtime::evaluator::evaluate_condition;
use crate::runtime::selector::select_rules;
use crate::runtime::trace::trace_candidates;

// ============================================================================
// SECTION: Engine Errors
// ============================================================================

/// Errors surfaced by a decision evaluation.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The rule store read failed.
    #[error("rule store error: {0}")]
    Store(#[from] RuleStoreError),
}

// ============================================================================
// SECTION: Decision Engine
// ============================================================================

/// Deterministic decision engine over a rule store.
#[derive(Debug, Clone)]
pub struct DecisionEngine<S> {
    /// Read-only rule store collaborator.
    store: S,
}

impl<S> DecisionEngine<S>
where
    S: RuleStore,
{
    /// Creates an engine over the given rule store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            store,
        }
    }

    /// Returns the underlying rule store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Evaluates one decision request.
    ///
    /// Builds the request-scoped fact context, selects candidate rules,
    /// evaluates each candidate's condition, aggregates matched rules into
    /// the output, and attaches the diagnostic trace when requested.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Store`] when the rule store read fails. Empty
    /// candidate or matched sets are normal results, not errors.
    pub fn evaluate(&self, request: &DecisionRequest) -> Result<DecisionOutput, EngineError> {
        let facts = FactContext::new(request);
        let candidates =
            select_rules(&self.store, &request.jurisdiction_id, &request.flow_id)?;

        let matched: Vec<&Rule> = candidates
            .iter()
            .filter(|rule| evaluate_condition(&rule.condition, &facts).matches)
            .collect();

        let mut output = aggregate_matched(&matched);
        if request.debug {
            output.debug = Some(trace_candidates(&candidates, &facts));
        }
        Ok(output)
    }
}
