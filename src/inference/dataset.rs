use crate::spreadsheet::CellValue;
use serde::Serialize;

/// Ordered column indices belonging to one inferred table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldIndices(Vec<usize>);

impl FieldIndices {
    /// The contiguous span from the first to the last non-null cell of `row`.
    /// Null cells inside the span are kept: they are sparse header cells, not column breaks.
    pub fn span(row: &[CellValue]) -> Self {
        let first = row.iter().position(|cell| !cell.is_null());
        let last = row.iter().rposition(|cell| !cell.is_null());
        match first.zip(last) {
            Some((first, last)) => FieldIndices((first..=last).collect()),
            None => FieldIndices::default(),
        }
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The leftmost field index.
    pub fn first(&self) -> Option<usize> {
        self.0.first().copied()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    /// Whether the two sets share at least one index.
    pub fn intersects(&self, other: &FieldIndices) -> bool {
        self.iter().any(|index| other.contains(index))
    }

    /// This set without the indices claimed by `other`.
    pub fn without(&self, other: &FieldIndices) -> Self {
        FieldIndices(self.iter().filter(|index| !other.contains(*index)).collect())
    }

    /// Drops the indices before `index`; unchanged when `index` is not in the set.
    pub(crate) fn truncate_before(&mut self, index: usize) {
        if let Some(position) = self.0.iter().position(|it| *it == index) {
            self.0.drain(..position);
        }
    }

    pub(crate) fn prepend(&mut self, index: usize) {
        self.0.insert(0, index);
    }
}

impl From<Vec<usize>> for FieldIndices {
    fn from(indices: Vec<usize>) -> Self {
        FieldIndices(indices)
    }
}

/// Row range and columns of one inferred table.
///
/// `end_row` is exclusive when materializing; an open descriptor extends to the end of the sheet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DatasetDescriptor {
    /// Index of the header row that opened the dataset
    pub start_row: usize,
    /// Set when a later header row closes the dataset
    pub end_row: Option<usize>,
    /// Columns of the dataset
    pub fields: FieldIndices,
}

impl DatasetDescriptor {
    pub fn new(start_row: usize, fields: FieldIndices) -> Self {
        DatasetDescriptor {
            start_row,
            end_row: None,
            fields,
        }
    }

    pub fn is_open(&self) -> bool {
        self.end_row.is_none()
    }

    /// The exclusive end row, defaulting to `sheet_len` for open datasets.
    pub fn end_or(&self, sheet_len: usize) -> usize {
        self.end_row.unwrap_or(sheet_len).min(sheet_len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_keeps_inner_gaps() {
        let row = vec![
            CellValue::Null,
            CellValue::from("Item"),
            CellValue::Null,
            CellValue::from(3.0),
            CellValue::Null,
        ];
        assert_eq!(FieldIndices::span(&row).as_slice(), &[1, 2, 3]);
        assert!(FieldIndices::span(&[CellValue::Null]).is_empty());
        assert!(FieldIndices::span(&[]).is_empty());
    }

    #[test]
    fn set_operations() {
        let left = FieldIndices::from(vec![0, 1, 2, 3]);
        let right = FieldIndices::from(vec![2, 3, 4, 5, 6, 7, 8, 9]);
        assert!(left.intersects(&right));
        assert_eq!(right.without(&left).as_slice(), &[4, 5, 6, 7, 8, 9]);
        assert!(!right.without(&left).intersects(&left));

        let mut fields = FieldIndices::from(vec![1, 2, 3, 4]);
        fields.truncate_before(3);
        assert_eq!(fields.as_slice(), &[3, 4]);
        fields.truncate_before(9);
        assert_eq!(fields.as_slice(), &[3, 4]);
        fields.prepend(1);
        assert_eq!(fields.as_slice(), &[1, 3, 4]);
    }

    #[test]
    fn open_descriptors_end_at_sheet_length() {
        let mut descriptor = DatasetDescriptor::new(2, FieldIndices::from(vec![0, 1]));
        assert!(descriptor.is_open());
        assert_eq!(descriptor.end_or(10), 10);
        descriptor.end_row = Some(6);
        assert_eq!(descriptor.end_or(10), 6);
    }
}
