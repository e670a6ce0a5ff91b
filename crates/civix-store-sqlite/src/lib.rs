// crates/civix-store-sqlite/src/lib.rs
// ============================================================================
// Module: Civix SQLite Store Library
// Description: Read-only SQLite rule store for the decision engine.
// Purpose: Serve rule records from a SQLite library with fail-closed decoding.
// Dependencies: civix-core, rusqlite, serde_json
// ============================================================================

//! ## Overview
//! This crate implements the engine's [`civix_core::RuleStore`] contract
//! over a `SQLite` rule library. Opens are read-only; rule authoring happens
//! in external tooling against the published schema.
//! Invariants:
//! - Stored condition and recommendation JSON decodes fail closed.
//! - Query results honor the selection predicate and ordering contract.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::RULES_SCHEMA_SQL;
pub use store::SCHEMA_VERSION;
pub use store::SqliteRuleStore;
pub use store::apply_schema;
