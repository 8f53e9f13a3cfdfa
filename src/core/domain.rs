//! Domain models for plan/slot cross-matching.
//!
//! This module provides the core data structures of the matching pipeline:
//! planned observations, allocated execution slots, the tolerances that
//! govern candidate selection, and the records the matcher and window
//! adjuster emit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A planned observation window from the observational plan.
///
/// Timestamps are naive civil times: no timezone normalization is applied
/// beyond what the input table already encodes. `start <= stop` is assumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Observation {
    /// Row position in the plan table (0-based).
    pub index: usize,
    pub start: NaiveDateTime,
    pub stop: NaiveDateTime,
}

impl Observation {
    pub fn new(index: usize, start: NaiveDateTime, stop: NaiveDateTime) -> Self {
        Self { index, start, stop }
    }
}

/// An allocated execution slot, usable by at most one observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Row position in the slot table (0-based). Stable identity for the
    /// whole run; the exclusivity invariant is expressed in terms of it.
    pub index: usize,
    pub start: NaiveDateTime,
    pub stop: NaiveDateTime,
}

impl Slot {
    pub fn new(index: usize, start: NaiveDateTime, stop: NaiveDateTime) -> Self {
        Self { index, start, stop }
    }
}

/// Tolerances governing which slots are candidate matches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerances {
    /// Maximum hour-of-day deviation between plan and slot edges, in hours.
    pub hours: f64,
    /// Half-width of the calendar window around the observation, in days.
    pub days: i64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self { hours: 2.0, days: 3 }
    }
}

/// Outcome of matching one observation.
///
/// One record per plan row, in plan order. `slot` is `None` when no
/// candidate survived filtering; the record shape is the same either way,
/// so the output schema stays statically known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRecord {
    pub observation: Observation,
    pub slot: Option<Slot>,
}

impl MatchRecord {
    pub fn is_matched(&self) -> bool {
        self.slot.is_some()
    }
}

/// A match record plus the reconciled actual execution window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustedRecord {
    pub record: MatchRecord,
    /// Actual (start, end) inside the assigned slot. `None` when the
    /// observation is unmatched or the clamped window is degenerate.
    pub actual: Option<(NaiveDateTime, NaiveDateTime)>,
}
