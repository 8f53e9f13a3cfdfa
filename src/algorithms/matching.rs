//! Greedy plan-order cross-matching of observations against allocated slots.

use chrono::{Duration, TimeDelta};

use crate::core::domain::{MatchRecord, Observation, Slot, Tolerances};
use crate::time::time_of_day_minutes;

/// Returns true when either edge of the slot lies within the hour-of-day
/// tolerance of the corresponding plan edge.
///
/// The two edges combine with OR: a slot whose stop time-of-day aligns
/// passes even when its start time-of-day is far off. Time-of-day is
/// hour+minute only, compared as a plain (non-wrapping) difference in
/// integer minutes, so a pair exactly on the tolerance boundary always
/// passes regardless of where the minute values fall.
fn within_hour_tolerance(obs: &Observation, slot: &Slot, hours: f64) -> bool {
    let start_diff = (time_of_day_minutes(obs.start) - time_of_day_minutes(slot.start)).abs();
    let stop_diff = (time_of_day_minutes(obs.stop) - time_of_day_minutes(slot.stop)).abs();
    let tolerance_minutes = hours * 60.0;
    start_diff as f64 <= tolerance_minutes || stop_diff as f64 <= tolerance_minutes
}

/// Match each observation to at most one unused slot.
///
/// Observations are processed strictly in plan order, and the order is
/// significant: a slot claimed by an earlier observation is never
/// reconsidered, even when a later observation would fit it better. The
/// used-slot bitmap is owned by this call; no state survives the run.
///
/// Per observation, candidate slots must lie entirely within its calendar
/// window widened by `tolerances.days` on each side, and pass the
/// hour-of-day filter. Among the survivors the slot with the smallest
/// absolute start-timestamp difference wins; ties go to the slot appearing
/// first in the slot table. An observation with no surviving candidate
/// yields an unmatched record, never an error.
///
/// Runs in O(n·m) single-threaded; exclusivity is maintained purely by the
/// sequential loop. A parallel driver would have to share one claim set
/// with atomic check-and-mark per slot.
pub fn cross_match_observations(
    observations: &[Observation],
    slots: &[Slot],
    tolerances: &Tolerances,
) -> Vec<MatchRecord> {
    let mut used = vec![false; slots.len()];
    let day_tolerance = Duration::days(tolerances.days);

    observations
        .iter()
        .map(|obs| {
            let window_start = obs.start - day_tolerance;
            let window_stop = obs.stop + day_tolerance;

            let mut best: Option<(TimeDelta, usize)> = None;
            for (position, slot) in slots.iter().enumerate() {
                if used[position] {
                    continue;
                }
                // Both slot edges must fall inside the widened calendar window
                if slot.start < window_start || slot.stop > window_stop {
                    continue;
                }
                if !within_hour_tolerance(obs, slot, tolerances.hours) {
                    continue;
                }
                // Full-resolution distance: sub-second differences count
                let diff = (slot.start - obs.start).abs();
                // Strict improvement only, so ties keep the earlier slot
                if best.map_or(true, |(best_diff, _)| diff < best_diff) {
                    best = Some((diff, position));
                }
            }

            let slot = best.map(|(_, position)| {
                used[position] = true;
                slots[position]
            });

            MatchRecord {
                observation: *obs,
                slot,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn dt(raw: &str) -> NaiveDateTime {
        crate::time::parse_timestamp(raw).unwrap()
    }

    fn obs(index: usize, start: &str, stop: &str) -> Observation {
        Observation::new(index, dt(start), dt(stop))
    }

    fn slot(index: usize, start: &str, stop: &str) -> Slot {
        Slot::new(index, dt(start), dt(stop))
    }

    fn assigned_indices(records: &[MatchRecord]) -> Vec<Option<usize>> {
        records.iter().map(|r| r.slot.map(|s| s.index)).collect()
    }

    #[test]
    fn test_basic_match() {
        let observations = vec![obs(0, "2024-01-10 22:00:00", "2024-01-11 02:00:00")];
        let slots = vec![slot(0, "2024-01-10 21:30:00", "2024-01-11 03:00:00")];

        let records =
            cross_match_observations(&observations, &slots, &Tolerances::default());
        assert_eq!(assigned_indices(&records), vec![Some(0)]);
    }

    #[test]
    fn test_no_candidates_yields_unmatched_record() {
        let observations = vec![obs(0, "2024-01-10 22:00:00", "2024-01-11 02:00:00")];
        // Calendar range is months away
        let slots = vec![slot(0, "2024-06-01 22:00:00", "2024-06-02 02:00:00")];

        let records =
            cross_match_observations(&observations, &slots, &Tolerances::default());
        assert_eq!(records.len(), 1);
        assert!(!records[0].is_matched());
        assert_eq!(records[0].observation.index, 0);
    }

    #[test]
    fn test_slot_exclusivity() {
        // Two observations both prefer the first slot; the second must fall
        // back to the remaining one.
        let observations = vec![
            obs(0, "2024-01-10 22:00:00", "2024-01-11 02:00:00"),
            obs(1, "2024-01-10 22:00:00", "2024-01-11 02:00:00"),
        ];
        let slots = vec![
            slot(0, "2024-01-10 22:00:00", "2024-01-11 02:00:00"),
            slot(1, "2024-01-11 22:00:00", "2024-01-12 02:00:00"),
        ];

        let records =
            cross_match_observations(&observations, &slots, &Tolerances::default());
        assert_eq!(assigned_indices(&records), vec![Some(0), Some(1)]);
    }

    #[test]
    fn test_plan_order_wins_over_better_fit() {
        // The second observation starts exactly at the slot's start, but the
        // first observation is processed first and claims it.
        let observations = vec![
            obs(0, "2024-01-10 23:00:00", "2024-01-11 01:00:00"),
            obs(1, "2024-01-10 22:00:00", "2024-01-11 02:00:00"),
        ];
        let slots = vec![slot(0, "2024-01-10 22:00:00", "2024-01-11 02:00:00")];

        let records =
            cross_match_observations(&observations, &slots, &Tolerances::default());
        assert_eq!(assigned_indices(&records), vec![Some(0), None]);
    }

    #[test]
    fn test_hour_tolerance_boundary_inclusive() {
        let observations = vec![obs(0, "2024-01-10 10:00:00", "2024-01-10 12:00:00")];
        // Start time-of-day exactly 2h away on both edges
        let slots = vec![slot(0, "2024-01-10 12:00:00", "2024-01-10 14:00:00")];

        let tolerances = Tolerances { hours: 2.0, days: 3 };
        let records = cross_match_observations(&observations, &slots, &tolerances);
        assert_eq!(assigned_indices(&records), vec![Some(0)]);
    }

    #[test]
    fn test_hour_tolerance_exceeded_by_one_minute() {
        let observations = vec![obs(0, "2024-01-10 10:00:00", "2024-01-10 12:00:00")];
        // Both edges 2h01m away in time-of-day
        let slots = vec![slot(0, "2024-01-10 12:01:00", "2024-01-10 14:01:00")];

        let tolerances = Tolerances { hours: 2.0, days: 3 };
        let records = cross_match_observations(&observations, &slots, &tolerances);
        assert_eq!(assigned_indices(&records), vec![None]);
    }

    #[test]
    fn test_hour_tolerance_boundary_at_inexact_minute_values() {
        // Start edges exactly 2h apart at minute :01, where a
        // fractional-hour time-of-day would round past the boundary; the
        // stop edges are far outside tolerance, so only the start edge can
        // carry the match.
        let observations = vec![obs(0, "2024-01-10 06:01:00", "2024-01-10 06:30:00")];
        let slots = vec![slot(0, "2024-01-10 08:01:00", "2024-01-10 14:00:00")];

        let records =
            cross_match_observations(&observations, &slots, &Tolerances::default());
        assert_eq!(assigned_indices(&records), vec![Some(0)]);
    }

    #[test]
    fn test_hour_filter_excludes_only_candidate() {
        // In calendar range but outside hour tolerance on both edges: the
        // slot is silently excluded even though nothing else is available.
        let observations = vec![obs(0, "2024-01-10 08:00:00", "2024-01-10 10:00:00")];
        let slots = vec![slot(0, "2024-01-10 20:00:00", "2024-01-10 22:00:00")];

        let records =
            cross_match_observations(&observations, &slots, &Tolerances::default());
        assert_eq!(assigned_indices(&records), vec![None]);
    }

    #[test]
    fn test_stop_edge_alone_is_sufficient() {
        // Start times-of-day are 8h apart, but the stop edges align, and the
        // two edges combine with OR.
        let observations = vec![obs(0, "2024-01-10 04:00:00", "2024-01-10 21:00:00")];
        let slots = vec![slot(0, "2024-01-10 12:00:00", "2024-01-10 21:30:00")];

        let records =
            cross_match_observations(&observations, &slots, &Tolerances::default());
        assert_eq!(assigned_indices(&records), vec![Some(0)]);
    }

    #[test]
    fn test_best_fit_prefers_closest_start() {
        let observations = vec![obs(0, "2024-01-10 22:00:00", "2024-01-11 02:00:00")];
        let slots = vec![
            slot(0, "2024-01-09 22:00:00", "2024-01-10 02:00:00"),
            slot(1, "2024-01-10 22:00:00", "2024-01-11 02:00:00"),
        ];

        let records =
            cross_match_observations(&observations, &slots, &Tolerances::default());
        assert_eq!(assigned_indices(&records), vec![Some(1)]);
    }

    #[test]
    fn test_best_fit_resolves_sub_second_differences() {
        // 1.5s vs 1.2s from the observation start: not a tie, the closer
        // slot wins even though both truncate to the same whole second.
        let observations = vec![obs(0, "2024-01-10 22:00:00", "2024-01-11 02:00:00")];
        let slots = vec![
            slot(0, "2024-01-10 22:00:01.500", "2024-01-11 02:00:00"),
            slot(1, "2024-01-10 22:00:01.200", "2024-01-11 02:00:00"),
        ];

        let records =
            cross_match_observations(&observations, &slots, &Tolerances::default());
        assert_eq!(assigned_indices(&records), vec![Some(1)]);
    }

    #[test]
    fn test_tie_break_keeps_first_slot_in_table_order() {
        // Two slots equidistant from the observation start (one day before,
        // one day after): the earlier table row wins.
        let observations = vec![obs(0, "2024-01-10 22:00:00", "2024-01-11 02:00:00")];
        let slots = vec![
            slot(0, "2024-01-11 22:00:00", "2024-01-12 02:00:00"),
            slot(1, "2024-01-09 22:00:00", "2024-01-10 02:00:00"),
        ];

        let records =
            cross_match_observations(&observations, &slots, &Tolerances::default());
        assert_eq!(assigned_indices(&records), vec![Some(0)]);
    }

    #[test]
    fn test_calendar_window_requires_both_edges_inside() {
        // Slot stop exceeds obs.stop + day_tolerance, so it is not a
        // candidate even though the slot start is inside the window.
        let observations = vec![obs(0, "2024-01-10 22:00:00", "2024-01-11 02:00:00")];
        let slots = vec![slot(0, "2024-01-12 22:00:00", "2024-01-15 02:00:00")];

        let tolerances = Tolerances { hours: 24.0, days: 3 };
        let records = cross_match_observations(&observations, &slots, &tolerances);
        assert_eq!(assigned_indices(&records), vec![None]);
    }

    #[test]
    fn test_order_and_count_preserved() {
        let observations = vec![
            obs(0, "2024-01-10 22:00:00", "2024-01-11 02:00:00"),
            obs(1, "2024-03-01 10:00:00", "2024-03-01 12:00:00"),
            obs(2, "2024-01-11 22:00:00", "2024-01-12 02:00:00"),
        ];
        let slots = vec![
            slot(0, "2024-01-10 22:00:00", "2024-01-11 02:00:00"),
            slot(1, "2024-01-11 22:00:00", "2024-01-12 02:00:00"),
        ];

        let records =
            cross_match_observations(&observations, &slots, &Tolerances::default());
        assert_eq!(records.len(), 3);
        let positions: Vec<usize> = records.iter().map(|r| r.observation.index).collect();
        assert_eq!(positions, vec![0, 1, 2]);
        assert_eq!(assigned_indices(&records), vec![Some(0), None, Some(1)]);
    }
}
