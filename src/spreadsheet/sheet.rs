use crate::spreadsheet::cell::CellValue;

static NULL: CellValue = CellValue::Null;

/// An in-memory worksheet: a dense row-major grid of typed cell values anchored at A1.
///
/// Rows may have different lengths; reads past the end of a row or of the sheet yield
/// `CellValue::Null`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Worksheet {
    /// Sheet name
    name: String,
    /// Rows in sheet order
    rows: Vec<Vec<CellValue>>,
}

impl Worksheet {
    /// Creates a worksheet from already materialized rows.
    pub fn from_rows(name: &str, rows: Vec<Vec<CellValue>>) -> Self {
        Worksheet {
            name: name.to_owned(),
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Number of rows in the sheet.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the row at `index`, or an empty slice past the last row.
    pub fn row(&self, index: usize) -> &[CellValue] {
        self.rows.get(index).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the cell at (`row`, `col`), treating missing cells as null.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        cell_at(self.row(row), col)
    }
}

/// Reads a cell from a row slice, treating positions past its end as null.
#[inline]
pub(crate) fn cell_at(row: &[CellValue], col: usize) -> &CellValue {
    row.get(col).unwrap_or(&NULL)
}

/// Collects sparse cells while a worksheet part is parsed and densifies them on `finish`.
pub(crate) struct SheetBuilder {
    /// Sheet name
    name: String,
    /// Non-null cells as (row, col, value)
    cells: Vec<(usize, usize, CellValue)>,
    /// Highest row index seen
    pub(crate) row_upper_bound: Option<usize>,
}

impl SheetBuilder {
    pub(crate) fn new(name: &str) -> Self {
        SheetBuilder {
            name: name.to_owned(),
            cells: Vec::new(),
            row_upper_bound: None,
        }
    }

    /// Adds a cell; null values are dropped since the grid starts out null.
    pub(crate) fn push(&mut self, row: usize, col: usize, value: CellValue) {
        if value.is_null() {
            return;
        }
        if self.row_upper_bound.map(|upper| upper < row).unwrap_or(true) {
            self.row_upper_bound = Some(row);
        }
        self.cells.push((row, col, value));
    }

    /// Builds the grid from A1 down to the last used row.
    /// Each row ends at its own last used column; shorter rows read as null past their end.
    pub(crate) fn finish(self) -> Worksheet {
        let row_count = self.row_upper_bound.map(|upper| upper + 1).unwrap_or(0);
        let mut rows = vec![Vec::<CellValue>::new(); row_count];
        for (row, col, value) in self.cells {
            let cells = &mut rows[row];
            if cells.len() <= col {
                cells.resize(col + 1, CellValue::Null);
            }
            cells[col] = value;
        }
        Worksheet::from_rows(&self.name, rows)
    }
}
