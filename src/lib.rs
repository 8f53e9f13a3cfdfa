//! # Crossmatch
//!
//! Observational-plan / allocated-slot cross-matching engine.
//!
//! This crate matches a planned schedule of observation windows against a
//! table of allocated execution slots, resolving each planned observation
//! to at most one slot under day- and hour-of-day tolerance constraints,
//! then reconciles the actual clock-time window during which each
//! observation ran inside its assigned slot.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`core`]: Domain models (observations, slots, match records)
//! - [`time`]: Civil timestamp parsing and time-of-day helpers
//! - [`algorithms`]: The greedy matcher and the window adjuster
//! - [`parsing`]: CSV parsing into Polars DataFrames and typed rows
//! - [`services`]: Pipeline orchestration (load, match, adjust, write)
//!
//! Matching is greedy and strictly plan-ordered: each observation claims
//! the best still-unused slot at the moment it is processed, and claimed
//! slots are never reconsidered. This is a deliberate trade-off, not a
//! globally optimal assignment.

pub mod algorithms;
pub mod core;
pub mod parsing;
pub mod services;
pub mod time;
