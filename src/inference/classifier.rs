use crate::inference::column::ColumnTypes;
use crate::inference::config::Heuristics;
use crate::inference::dataset::FieldIndices;
use crate::spreadsheet::sheet::cell_at;
use crate::spreadsheet::CellValue;
use crate::spreadsheet::ValueKind;

/// Simple header rule: the row carries at least `min_header_dates` dates (period headers).
pub fn is_simple_header(row: &[CellValue], heuristics: &Heuristics) -> bool {
    row.iter().filter(|cell| cell.is_date()).count() >= heuristics.min_header_dates
}

/// Complex header rule: a blank separator row, followed by a row of text and dates only,
/// whose kinds contradict the kinds recorded for at least one tracked column.
pub fn is_complex_header(
    previous_row: &[CellValue],
    row: &[CellValue],
    fields: &FieldIndices,
    types: &ColumnTypes,
) -> bool {
    if !previous_row.iter().all(CellValue::is_null) {
        return false;
    }
    if row.iter().any(|cell| matches!(cell.kind(), ValueKind::Number)) {
        return false;
    }
    fields.iter().any(|col| {
        let cell = cell_at(row, col);
        !cell.is_null() && types.get(col).is_some_and(|kind| kind != cell.kind())
    })
}

/// Whether `row` is a header, given the previous row and the running column state.
pub fn is_header_row(
    previous_row: &[CellValue],
    row: &[CellValue],
    fields: &FieldIndices,
    types: &ColumnTypes,
    heuristics: &Heuristics,
) -> bool {
    is_simple_header(row, heuristics) || is_complex_header(previous_row, row, fields, types)
}
