//! # Structure Inference
//!
//! A single pass over a worksheet that finds where ad hoc tables start and end:
//!
//! - [`classifier`] decides whether a row is a header (period dates, or a re-typed row
//!   after a blank separator)
//! - [`tracker`] opens, splits and closes [`DatasetDescriptor`]s as header rows appear
//! - [`label`] pulls the row-label column into a dataset when the header missed it
//! - [`column`] remembers the value kinds seen per column since the last header
pub mod classifier;
pub mod column;
pub mod config;
pub mod dataset;
pub mod label;
pub mod tracker;

pub use config::Heuristics;
pub use dataset::DatasetDescriptor;
pub use dataset::FieldIndices;
pub use tracker::track_datasets;
pub use tracker::TrackerState;

use thiserror::Error;

/// Errors raised by the inference engine.
#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("Dataset starting at row {start_row} has no field indices")]
    EmptyFieldSet { start_row: usize },
}
