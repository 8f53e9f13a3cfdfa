use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use polars::prelude::*;
use std::path::Path;

use crate::core::domain::{Observation, Slot};
use crate::time;

/// Timestamp column names in the plan table.
pub const PLAN_START: &str = "StartTime";
pub const PLAN_STOP: &str = "StopTime";

/// Timestamp column names in the slot table.
pub const SLOT_START: &str = "startTime";
pub const SLOT_STOP: &str = "stopTime";

/// Parse a CSV file into a Polars DataFrame, verifying the two required
/// timestamp columns and forcing them to String in case the reader
/// inferred something else.
pub fn parse_table_csv(csv_path: &Path, time_columns: [&str; 2]) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(csv_path.into()))?
        .finish()
        .with_context(|| format!("Failed to parse CSV {}", csv_path.display()))?;

    let column_names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    for required in time_columns {
        if !column_names.contains(&required.to_string()) {
            anyhow::bail!(
                "{}: missing required column '{}'",
                csv_path.display(),
                required
            );
        }
    }

    let mut lazy_df = df.lazy();
    for col_name in time_columns {
        lazy_df = lazy_df.with_column(col(col_name).cast(DataType::String));
    }

    let df = lazy_df
        .collect()
        .context("Failed to cast timestamp columns to String")?;

    Ok(df)
}

/// Load the observational plan: the raw DataFrame plus its typed rows.
pub fn parse_plan_csv(csv_path: &Path) -> Result<(DataFrame, Vec<Observation>)> {
    let df = parse_table_csv(csv_path, [PLAN_START, PLAN_STOP])?;
    let observations = dataframe_to_observations(&df)?;
    Ok((df, observations))
}

/// Load the allocated slots: the raw DataFrame plus its typed rows.
pub fn parse_slots_csv(csv_path: &Path) -> Result<(DataFrame, Vec<Slot>)> {
    let df = parse_table_csv(csv_path, [SLOT_START, SLOT_STOP])?;
    let slots = dataframe_to_slots(&df)?;
    Ok((df, slots))
}

/// Extract typed observations from a plan DataFrame.
pub fn dataframe_to_observations(df: &DataFrame) -> Result<Vec<Observation>> {
    Ok(extract_periods(df, PLAN_START, PLAN_STOP)?
        .into_iter()
        .enumerate()
        .map(|(index, (start, stop))| Observation::new(index, start, stop))
        .collect())
}

/// Extract typed slots from a slot DataFrame.
pub fn dataframe_to_slots(df: &DataFrame) -> Result<Vec<Slot>> {
    Ok(extract_periods(df, SLOT_START, SLOT_STOP)?
        .into_iter()
        .enumerate()
        .map(|(index, (start, stop))| Slot::new(index, start, stop))
        .collect())
}

/// Pull (start, stop) timestamp pairs out of two String columns.
///
/// Fails fast on the first missing or malformed value; a half-parsed table
/// is never returned.
fn extract_periods(
    df: &DataFrame,
    start_col: &str,
    stop_col: &str,
) -> Result<Vec<(NaiveDateTime, NaiveDateTime)>> {
    let starts = df.column(start_col)?.str()?;
    let stops = df.column(stop_col)?.str()?;

    let mut periods = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let start_raw = starts
            .get(i)
            .with_context(|| format!("Missing {} at row {}", start_col, i))?;
        let stop_raw = stops
            .get(i)
            .with_context(|| format!("Missing {} at row {}", stop_col, i))?;

        let start = time::parse_timestamp(start_raw)
            .with_context(|| format!("Invalid {} at row {}", start_col, i))?;
        let stop = time::parse_timestamp(stop_raw)
            .with_context(|| format!("Invalid {} at row {}", stop_col, i))?;

        periods.push((start, stop));
    }

    Ok(periods)
}
