use crate::inference::classifier::is_header_row;
use crate::inference::column::ColumnTypes;
use crate::inference::config::Heuristics;
use crate::inference::dataset::DatasetDescriptor;
use crate::inference::dataset::FieldIndices;
use crate::inference::label::recover_label_column;
use crate::spreadsheet::CellValue;
use crate::spreadsheet::Worksheet;
use log::debug;
use log::trace;
use log::warn;

/// Outcome of classifying one row.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RowClass {
    Header,
    Body,
}

/// Running state of one pass over a worksheet.
///
/// Each worksheet gets its own state; nothing is shared between passes.
#[derive(Clone, Debug, Default)]
pub struct TrackerState {
    /// Columns of the most recently opened dataset
    fields: FieldIndices,
    /// Kinds seen in body rows since the last header
    types: ColumnTypes,
    /// Values of the row processed before the current one
    previous_row: Vec<CellValue>,
    /// Datasets in the order their headers appeared
    datasets: Vec<DatasetDescriptor>,
}

impl TrackerState {
    pub fn new() -> Self {
        TrackerState::default()
    }

    pub fn fields(&self) -> &FieldIndices {
        &self.fields
    }

    pub fn column_types(&self) -> &ColumnTypes {
        &self.types
    }

    pub fn datasets(&self) -> &[DatasetDescriptor] {
        &self.datasets
    }

    pub fn into_datasets(self) -> Vec<DatasetDescriptor> {
        self.datasets
    }

    /// Processes row `index` of `sheet`. Rows must be fed in sheet order.
    pub fn step(&mut self, sheet: &Worksheet, index: usize, heuristics: &Heuristics) -> RowClass {
        let row = sheet.row(index);
        let class = if is_header_row(&self.previous_row, row, &self.fields, &self.types, heuristics) {
            self.open_dataset(sheet, index, heuristics);
            RowClass::Header
        } else {
            if self.fields.len() > 1 {
                self.types.observe(row, &self.fields);
            }
            RowClass::Body
        };
        trace!("row {}: {:?}", index, class);
        self.previous_row = row.to_vec();
        class
    }

    /// Handles a header row: splits it from the previous dataset if needed, recovers the
    /// label column, closes the overlapping open dataset and opens a new one.
    fn open_dataset(&mut self, sheet: &Worksheet, index: usize, heuristics: &Heuristics) {
        self.types.reset();

        let mut fields = FieldIndices::span(sheet.row(index));
        let previous = &self.fields;
        if !previous.is_empty() && previous.len().abs_diff(fields.len()) > heuristics.split_column_delta {
            debug!(
                "row {}: header spans {} columns against {}, splitting from {:?}",
                index,
                fields.len(),
                previous.len(),
                previous.as_slice()
            );
            fields = fields.without(previous);
        }
        if fields.is_empty() {
            warn!("row {}: header has no columns left after splitting, no dataset opened", index);
            return;
        }

        let fields = recover_label_column(sheet, index, fields, heuristics);
        if let Some(closed) = close_overlapping(&mut self.datasets, &fields, index.saturating_sub(1)) {
            debug!(
                "row {}: closed dataset started at row {}",
                index, self.datasets[closed].start_row
            );
        }
        debug!("row {}: opened dataset over columns {:?}", index, fields.as_slice());
        self.datasets.push(DatasetDescriptor::new(index, fields.clone()));
        self.fields = fields;
    }
}

/// Closes the first open dataset sharing a column with `fields`, returning its position.
///
/// Only one dataset is closed per header: overlapping groups are assumed to close in the
/// order their headers appeared.
pub fn close_overlapping(datasets: &mut [DatasetDescriptor], fields: &FieldIndices, end_row: usize) -> Option<usize> {
    let position = datasets
        .iter()
        .position(|dataset| dataset.is_open() && dataset.fields.intersects(fields))?;
    datasets[position].end_row = Some(end_row);
    Some(position)
}

/// Runs the classification and boundary tracking pass over a whole worksheet.
pub fn track_datasets(sheet: &Worksheet, heuristics: &Heuristics) -> Vec<DatasetDescriptor> {
    let mut state = TrackerState::new();
    for index in 0..sheet.len() {
        state.step(sheet, index, heuristics);
    }
    state.into_datasets()
}
