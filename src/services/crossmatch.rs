//! End-to-end cross-match pipeline: load, match, adjust, assemble, write.

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;
use tracing::info;

use crate::algorithms::{adjust_observation_times, cross_match_observations};
use crate::core::domain::{AdjustedRecord, Tolerances};
use crate::parsing::csv_parser;
use crate::time;

/// Summary of one pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossMatchReport {
    pub observations: usize,
    pub slots: usize,
    pub matched: usize,
}

/// Run the full pipeline and write the output table.
///
/// Loads the observational plan and the allocated slots, cross-matches
/// them under the given tolerances, reconciles the actual observation
/// windows, and writes one output row per plan row (in plan order) with
/// the union of plan columns, slot columns, and the two actual-window
/// columns. Unmatched rows carry nulls in all slot-derived fields.
pub fn run_crossmatch(
    plan_path: &Path,
    slots_path: &Path,
    output_path: &Path,
    tolerances: &Tolerances,
) -> Result<CrossMatchReport> {
    let (plan_df, observations) =
        csv_parser::parse_plan_csv(plan_path).context("Failed to load observational plan")?;
    let (slots_df, slots) =
        csv_parser::parse_slots_csv(slots_path).context("Failed to load allocated slots")?;
    info!(
        observations = observations.len(),
        slots = slots.len(),
        "Loaded plan and slot tables"
    );

    let matches = cross_match_observations(&observations, &slots, tolerances);
    let matched = matches.iter().filter(|m| m.is_matched()).count();
    info!(
        matched,
        unmatched = matches.len() - matched,
        "Cross-match complete"
    );

    let adjusted = adjust_observation_times(&matches);

    let mut out_df = assemble_output(&plan_df, &slots_df, &adjusted)?;
    write_output_csv(output_path, &mut out_df)?;
    info!(rows = out_df.height(), path = %output_path.display(), "Wrote output table");

    Ok(CrossMatchReport {
        observations: observations.len(),
        slots: slots.len(),
        matched,
    })
}

/// Build the output table: plan columns, then slot columns gathered through
/// the assignment (null rows where unmatched), then the actual window
/// columns formatted as nullable strings.
pub fn assemble_output(
    plan_df: &DataFrame,
    slots_df: &DataFrame,
    adjusted: &[AdjustedRecord],
) -> Result<DataFrame> {
    let indices: IdxCa = IdxCa::from_iter_options(
        "slot_idx".into(),
        adjusted
            .iter()
            .map(|rec| rec.record.slot.map(|slot| slot.index as IdxSize)),
    );
    let gathered = slots_df
        .take(&indices)
        .context("Failed to gather matched slot rows")?;

    let mut out = plan_df.clone();
    for column in gathered.get_columns() {
        // Replace-by-name: a slot column shadows a same-named plan column.
        out.with_column(column.clone())?;
    }

    let actual_starts: Vec<Option<String>> = adjusted
        .iter()
        .map(|rec| rec.actual.map(|(start, _)| time::format_timestamp(start)))
        .collect();
    let actual_ends: Vec<Option<String>> = adjusted
        .iter()
        .map(|rec| rec.actual.map(|(_, end)| time::format_timestamp(end)))
        .collect();

    out.with_column(Series::new("ActualStartTime".into(), actual_starts))?;
    out.with_column(Series::new("ActualEndTime".into(), actual_ends))?;

    Ok(out)
}

fn write_output_csv(path: &Path, df: &mut DataFrame) -> Result<()> {
    let mut file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(df)
        .context("Failed to write output CSV")?;
    Ok(())
}
