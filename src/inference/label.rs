use crate::inference::config::Heuristics;
use crate::inference::dataset::FieldIndices;
use crate::spreadsheet::Worksheet;
use log::trace;

/// Counts text cells in column `col` among the rows following `header_row`.
fn text_evidence(sheet: &Worksheet, header_row: usize, col: usize, heuristics: &Heuristics) -> usize {
    (1..=heuristics.label_window_rows)
        .filter(|offset| sheet.cell(header_row + offset, col).is_text())
        .count()
}

/// Widens or narrows a header's field set so that it starts at the label column.
///
/// Header cells are mostly periods, so the label column often has nothing on the header
/// row itself. Candidates around the leftmost index are scored by how many of the next
/// rows hold text in that column. Candidates are visited left to right and each
/// qualifying one replaces the previous decision: one already inside the set truncates
/// the set to start there, one outside becomes the single prepended label column.
pub fn recover_label_column(
    sheet: &Worksheet,
    header_row: usize,
    fields: FieldIndices,
    heuristics: &Heuristics,
) -> FieldIndices {
    let Some(leftmost) = fields.first() else {
        return fields;
    };
    let lower = leftmost.saturating_sub(heuristics.label_lookbehind);
    let upper = leftmost + heuristics.label_lookahead;

    let mut base = fields;
    let mut label = None::<usize>;
    for col in lower..=upper {
        let evidence = text_evidence(sheet, header_row, col, heuristics);
        if evidence < heuristics.label_min_text_cells {
            continue;
        }
        trace!("row {}: column {} qualifies as label column ({} text cells)", header_row, col, evidence);
        if base.contains(col) {
            base.truncate_before(col);
            label = None;
        } else {
            label = Some(col);
        }
    }

    if let Some(col) = label {
        base.prepend(col);
    }
    base
}
