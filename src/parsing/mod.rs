//! Parsers for the plan and slot tables.
//!
//! Input is tabular CSV: the plan carries `StartTime`/`StopTime`, the slot
//! table `startTime`/`stopTime`, each plus arbitrary descriptive columns
//! that pass through the pipeline unchanged. Only the timestamp columns
//! are parsed into typed rows; everything else stays in the DataFrame.

pub mod csv_parser;
