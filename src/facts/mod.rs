//! # Fact Extraction
//!
//! Turns the datasets found by [`crate::inference`] into records and then into
//! `path > column > value` strings.
pub mod flatten;
pub mod materialize;

pub use flatten::flatten;
pub use flatten::flatten_dataset;
pub use flatten::LevelMap;
pub use materialize::materialize;
pub use materialize::materialize_all;
pub use materialize::Record;

use crate::error::SheetFactsError;
use crate::inference::track_datasets;
use crate::inference::Heuristics;
use crate::spreadsheet::Worksheet;
use log::debug;

/// Runs the whole pipeline over one worksheet: boundary tracking, materialization and
/// flattening. A sheet without any header row yields no facts.
pub fn extract_facts(sheet: &Worksheet, heuristics: &Heuristics) -> Result<Vec<String>, SheetFactsError> {
    let descriptors = track_datasets(sheet, heuristics);
    debug!("{}: found {} dataset(s) in {} rows", sheet.name(), descriptors.len(), sheet.len());

    let datasets = materialize_all(sheet, &descriptors)?;
    let facts = flatten(&datasets, heuristics);
    debug!("{}: extracted {} fact(s)", sheet.name(), facts.len());
    Ok(facts)
}
