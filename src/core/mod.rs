pub mod domain;

pub use domain::{AdjustedRecord, MatchRecord, Observation, Slot, Tolerances};
