use crate::inference::dataset::FieldIndices;
use crate::spreadsheet::sheet::cell_at;
use crate::spreadsheet::CellValue;
use crate::spreadsheet::ValueKind;
use std::collections::BTreeMap;

/// First value kind observed per column since the last header.
///
/// Only the complex header rule reads it: a header-like row whose kinds contradict
/// the kinds recorded here starts a new header block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnTypes {
    kinds: BTreeMap<usize, ValueKind>,
}

impl ColumnTypes {
    /// Forgets every recorded kind; called on each header row.
    pub fn reset(&mut self) {
        self.kinds.clear();
    }

    /// The kind recorded for `col`, if any.
    pub fn get(&self, col: usize) -> Option<ValueKind> {
        self.kinds.get(&col).copied()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Records the kind of each non-null tracked cell of a body row, keeping earlier records.
    pub fn observe(&mut self, row: &[CellValue], fields: &FieldIndices) {
        for col in fields.iter() {
            let cell = cell_at(row, col);
            if !cell.is_null() {
                self.kinds.entry(col).or_insert_with(|| cell.kind());
            }
        }
    }
}
