// crates/civix-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Rule Store
// Description: Read-only RuleStore backed by SQLite.
// Purpose: Serve jurisdiction rules with deterministic ordering and
//          fail-closed row decoding.
// Dependencies: civix-core, rusqlite, serde_json
// ============================================================================

//! ## Overview
//! This module implements a read-only [`RuleStore`] using `SQLite`. The
//! fetch query applies the selection predicate (jurisdiction match plus
//! flow match or flow-null) and the ordering contract (priority descending,
//! creation recency descending) in SQL. Row decoding fails closed: a stored
//! condition or recommendation payload that does not parse rejects the
//! whole read with [`RuleStoreError::Invalid`], so an incompatible rule
//! library never reaches evaluation.
//!
//! The store is not transactionally isolated against concurrent rule edits;
//! two simultaneous reads may observe different snapshots, which the engine
//! tolerates by contract.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use civix_core::ConditionNode;
use civix_core::FlowId;
use civix_core::JurisdictionId;
use civix_core::Recommendations;
use civix_core::Rule;
use civix_core::RuleId;
use civix_core::RuleStore;
use civix_core::RuleStoreError;
use civix_core::Timestamp;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::params;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the rule library.
pub const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// Schema for the rule library consumed by this store.
///
/// Authoring tooling owns writes; this store only reads.
pub const RULES_SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS rules (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    jurisdiction_id TEXT NOT NULL,
    flow_id TEXT,
    condition TEXT NOT NULL,
    outcome TEXT NOT NULL,
    priority INTEGER NOT NULL,
    created_at INTEGER NOT NULL,
    reasoning TEXT,
    ordinance_code TEXT,
    source_url TEXT,
    recommendations TEXT
);
CREATE INDEX IF NOT EXISTS idx_rules_scope ON rules (jurisdiction_id, flow_id);
";

/// Fetch query applying the selection predicate and ordering contract.
const FETCH_RULES_SQL: &str = "
SELECT id, name, jurisdiction_id, flow_id, condition, outcome, priority,
       created_at, reasoning, ordinance_code, source_url, recommendations
FROM rules
WHERE jurisdiction_id = ?1 AND (flow_id = ?2 OR flow_id IS NULL)
ORDER BY priority DESC, created_at DESC
";

// ============================================================================
// SECTION: Schema Bootstrap
// ============================================================================

/// Applies the rule library schema and stamps the schema version.
///
/// Intended for authoring tooling and tests; the store itself never writes.
///
/// # Errors
///
/// Returns [`RuleStoreError::Io`] when schema statements fail.
pub fn apply_schema(conn: &Connection) -> Result<(), RuleStoreError> {
    conn.execute_batch(RULES_SCHEMA_SQL).map_err(io_error)?;
    conn.pragma_update(None, "user_version", SCHEMA_VERSION).map_err(io_error)?;
    Ok(())
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Read-only `SQLite` rule store.
///
/// # Invariants
/// - The connection is opened read-only; rule authoring is external.
/// - The schema version is verified at open and mismatches fail closed.
#[derive(Debug)]
pub struct SqliteRuleStore {
    /// Guarded connection; rusqlite connections are not `Sync`.
    conn: Mutex<Connection>,
}

impl SqliteRuleStore {
    /// Opens a rule library read-only and verifies its schema version.
    ///
    /// # Errors
    ///
    /// Returns [`RuleStoreError::Io`] when the database cannot be opened and
    /// [`RuleStoreError::Invalid`] on a schema version mismatch.
    pub fn open(path: &Path) -> Result<Self, RuleStoreError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(io_error)?;
        conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS)).map_err(io_error)?;

        let version: i64 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .map_err(io_error)?;
        if version != SCHEMA_VERSION {
            return Err(RuleStoreError::Invalid(format!(
                "rule library schema version {version} (store supports {SCHEMA_VERSION})"
            )));
        }

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl RuleStore for SqliteRuleStore {
    fn fetch_rules(
        &self,
        jurisdiction_id: &JurisdictionId,
        flow_id: &FlowId,
    ) -> Result<Vec<Rule>, RuleStoreError> {
        let conn = self
            .conn
            .lock()
            .map_err(|_poisoned| RuleStoreError::Store("connection lock poisoned".to_string()))?;

        let mut statement = conn.prepare_cached(FETCH_RULES_SQL).map_err(io_error)?;
        let rows = statement
            .query_map(params![jurisdiction_id.as_str(), flow_id.as_str()], read_raw_row)
            .map_err(io_error)?;

        let mut rules = Vec::new();
        for row in rows {
            let raw = row.map_err(io_error)?;
            rules.push(decode_rule(raw)?);
        }
        Ok(rules)
    }
}

// ============================================================================
// SECTION: Row Decoding
// ============================================================================

/// Raw column values for one rule row, before JSON decoding.
struct RawRuleRow {
    /// Rule identifier.
    id: String,
    /// Rule name.
    name: String,
    /// Jurisdiction identifier.
    jurisdiction_id: String,
    /// Optional flow scope.
    flow_id: Option<String>,
    /// Condition tree JSON payload.
    condition: String,
    /// Stored outcome label.
    outcome: String,
    /// Selection priority.
    priority: i64,
    /// Creation timestamp in unix milliseconds.
    created_at: i64,
    /// Optional authored reasoning.
    reasoning: Option<String>,
    /// Optional ordinance code citation.
    ordinance_code: Option<String>,
    /// Optional source URL citation.
    source_url: Option<String>,
    /// Optional recommendations JSON payload.
    recommendations: Option<String>,
}

/// Reads one raw row from the fetch query.
fn read_raw_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawRuleRow> {
    Ok(RawRuleRow {
        id: row.get(0)?,
        name: row.get(1)?,
        jurisdiction_id: row.get(2)?,
        flow_id: row.get(3)?,
        condition: row.get(4)?,
        outcome: row.get(5)?,
        priority: row.get(6)?,
        created_at: row.get(7)?,
        reasoning: row.get(8)?,
        ordinance_code: row.get(9)?,
        source_url: row.get(10)?,
        recommendations: row.get(11)?,
    })
}

/// Decodes a raw row into a rule record, failing closed on malformed JSON.
fn decode_rule(raw: RawRuleRow) -> Result<Rule, RuleStoreError> {
    let condition: ConditionNode = serde_json::from_str(&raw.condition).map_err(|err| {
        RuleStoreError::Invalid(format!("rule {}: condition does not decode: {err}", raw.id))
    })?;

    let recommendations = match &raw.recommendations {
        None => None,
        Some(payload) => Some(serde_json::from_str::<Recommendations>(payload).map_err(
            |err| {
                RuleStoreError::Invalid(format!(
                    "rule {}: recommendations do not decode: {err}",
                    raw.id
                ))
            },
        )?),
    };

    Ok(Rule {
        id: RuleId::new(raw.id),
        name: raw.name,
        jurisdiction_id: JurisdictionId::new(raw.jurisdiction_id),
        flow_id: raw.flow_id.map(FlowId::new),
        condition,
        outcome: raw.outcome,
        priority: raw.priority,
        created_at: Timestamp::from_unix_millis(raw.created_at),
        reasoning: raw.reasoning,
        ordinance_code: raw.ordinance_code,
        source_url: raw.source_url,
        recommendations,
    })
}

// ============================================================================
// SECTION: Error Mapping
// ============================================================================

/// Maps a rusqlite error onto the store error surface.
fn io_error(err: rusqlite::Error) -> RuleStoreError {
    RuleStoreError::Io(err.to_string())
}
