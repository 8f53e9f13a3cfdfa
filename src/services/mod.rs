//! Service layer orchestrating the cross-match pipeline.
//!
//! Sits between the parsers and the algorithms: loads the two tables,
//! runs the matcher and the window adjuster, assembles the output
//! DataFrame, and writes the final CSV.

pub mod crossmatch;


pub use crossmatch::{assemble_output, run_crossmatch, CrossMatchReport};
