// crates/civix-core/src/core/outcome.rs
// ============================================================================
// Module: Civix Outcome Labels
// Description: Closed compliance outcome enumeration and severity ranking.
// Purpose: Normalize stored outcome strings and rank them for conflict resolution.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Outcomes form a closed enumeration with a fixed severity ranking used to
//! resolve conflicts among simultaneously matched rules. Stored outcome
//! strings outside the closed set normalize to [`Outcome::Inconclusive`]
//! rather than failing, since rule libraries evolve independently of engine
//! releases.
//! Invariants:
//! - `conditional` and `needs_review` share severity 2; the tie is policy.
//! - Severity values are stable for persisted decisions.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Outcome Labels
// ============================================================================

/// Compliance outcome derived from a decision evaluation.
///
/// # Invariants
/// - Variants are stable for serialization and persisted decision records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The request is compliant as answered.
    Approved,
    /// The request is compliant subject to conditions.
    Conditional,
    /// The request is not compliant.
    Denied,
    /// The request requires manual review.
    NeedsReview,
    /// No rule produced a determination.
    Inconclusive,
}

impl Outcome {
    /// Normalizes a stored outcome label to the closed enumeration.
    ///
    /// Unrecognized labels map to [`Outcome::Inconclusive`].
    #[must_use]
    pub fn normalize(label: &str) -> Self {
        match label {
            "approved" => Self::Approved,
            "conditional" => Self::Conditional,
            "denied" => Self::Denied,
            "needs_review" => Self::NeedsReview,
            _ => Self::Inconclusive,
        }
    }

    /// Returns the fixed severity rank used for conflict resolution.
    ///
    /// Higher severity wins; `conditional` and `needs_review` deliberately
    /// share rank 2.
    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::Denied => 3,
            Self::NeedsReview | Self::Conditional => 2,
            Self::Approved => 1,
            Self::Inconclusive => 0,
        }
    }

    /// Returns the canonical wire label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Conditional => "conditional",
            Self::Denied => "denied",
            Self::NeedsReview => "needs_review",
            Self::Inconclusive => "inconclusive",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
