//! Cross-matching algorithms.
//!
//! Two passes, consumed in sequence:
//!
//! - [`matching`]: greedy plan-order assignment of observations to slots
//! - [`adjustment`]: reconciliation of each matched pair into the actual
//!   clock-time window the observation ran inside its slot
//!
//! Both passes are pure, deterministic transformations over in-memory
//! records; neither performs any I/O.

pub mod adjustment;
pub mod matching;

pub use adjustment::adjust_observation_times;
pub use matching::cross_match_observations;
