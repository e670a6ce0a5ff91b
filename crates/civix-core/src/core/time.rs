// crates/civix-core/src/core/time.rs
// ============================================================================
// Module: Civix Time Model
// Description: Canonical timestamp representation for rule records.
// Purpose: Provide deterministic, caller-supplied time values for recency ordering.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Rule records carry explicit creation timestamps so candidate ordering can
//! tie-break on recency deterministically. The engine never reads wall-clock
//! time; stores and hosts must supply timestamps with the rules they return.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Canonical timestamp used on rule records, in unix epoch milliseconds.
///
/// # Invariants
/// - Values are explicitly provided by callers; the core never reads wall-clock time.
/// - Total ordering follows the raw millisecond value; monotonicity is a
///   caller responsibility.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from unix epoch milliseconds.
    #[must_use]
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the timestamp as unix epoch milliseconds.
    #[must_use]
    pub const fn as_unix_millis(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
