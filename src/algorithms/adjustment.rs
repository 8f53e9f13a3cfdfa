//! Reconciliation of matched slots into actual execution windows.

use chrono::{Duration, Timelike};

use crate::core::domain::{AdjustedRecord, MatchRecord};
use crate::time::with_time_of_day;

/// True when the planned window crosses midnight: the plan's end hour is
/// before its start hour, or the end lands exactly on hour zero while the
/// start does not.
fn crosses_midnight(start_hour: u32, end_hour: u32) -> bool {
    end_hour < start_hour || (end_hour == 0 && start_hour != 0)
}

/// Compute the actual execution window for each matched record.
///
/// One output per input, in the same order. For a matched record the plan's
/// hour+minute is overlaid onto the slot's calendar date (the end lands on
/// the next day when the plan crosses midnight), then the window is clamped
/// to the slot's own bounds. A window that collapses under clamping yields
/// `None`, as does an unmatched record; neither is an error.
pub fn adjust_observation_times(records: &[MatchRecord]) -> Vec<AdjustedRecord> {
    records
        .iter()
        .map(|record| AdjustedRecord {
            record: *record,
            actual: record.slot.and_then(|slot| {
                let obs = &record.observation;
                let start_hour = obs.start.hour();
                let end_hour = obs.stop.hour();

                let candidate_start =
                    with_time_of_day(slot.start, start_hour, obs.start.minute());
                let end_base = if crosses_midnight(start_hour, end_hour) {
                    slot.start + Duration::days(1)
                } else {
                    slot.start
                };
                let candidate_end = with_time_of_day(end_base, end_hour, obs.stop.minute());

                // Keep the window inside the physical allocation
                let actual_start = candidate_start.max(slot.start);
                let actual_end = candidate_end.min(slot.stop);

                (actual_start < actual_end).then_some((actual_start, actual_end))
            }),
        })
        .collect()
}
