use crate::facts::materialize::Record;
use crate::inference::Heuristics;
use crate::spreadsheet::CellValue;
use log::warn;
use std::collections::BTreeMap;

/// Separator between the segments of a fact.
pub const SEGMENT_SEPARATOR: &str = " > ";

/// Number of leading whitespace characters of a row label.
pub fn indentation(label: &str) -> usize {
    label.chars().take_while(|c| c.is_whitespace()).count()
}

/// Most recent trimmed label seen at each indentation depth of one dataset.
///
/// Deeper entries are kept when a shallower label arrives; lookups only read depths
/// above the label being placed, so stale entries never reach a path.
#[derive(Clone, Debug, Default)]
pub struct LevelMap {
    labels: BTreeMap<usize, String>,
    /// Depth of the last recorded label
    current: Option<usize>,
}

impl LevelMap {
    /// Labels recorded strictly shallower than `label`, then `label` itself, trimmed.
    pub fn path(&self, label: &str) -> Vec<String> {
        let depth = indentation(label);
        let mut segments: Vec<String> = self.labels.range(..depth).map(|(_, parent)| parent.clone()).collect();
        segments.push(label.trim().to_owned());
        segments
    }

    /// Remembers `label` as the current parent at its depth.
    pub fn record(&mut self, label: &str) {
        let depth = indentation(label);
        self.labels.insert(depth, label.trim().to_owned());
        self.current = Some(depth);
    }

    /// Path of the last recorded label, empty before any label is recorded.
    pub fn current_path(&self) -> Vec<String> {
        match self.current {
            Some(depth) => self.labels.range(..=depth).map(|(_, label)| label.clone()).collect(),
            None => Vec::new(),
        }
    }
}

/// Turns one materialized dataset into facts. The first record is the header row.
pub fn flatten_dataset(records: &[Record], heuristics: &Heuristics) -> Vec<String> {
    let Some((header, body)) = records.split_first() else {
        return Vec::new();
    };
    if body.is_empty() {
        warn!("dataset has a header but no body rows");
    }

    // Only period columns get the long date form; the label header prints as is.
    let headers: Vec<Option<String>> = header
        .values()
        .enumerate()
        .map(|(position, cell)| match position {
            _ if cell.is_null() => None,
            0 => Some(cell.to_string()),
            _ => Some(cell.to_header_string(&heuristics.header_date_format)),
        })
        .collect();
    let indented = header.get(0).is_null();

    let mut levels = LevelMap::default();
    let mut facts = Vec::new();
    for record in body {
        let label = record.get(0);
        let path = if indented {
            indented_path(&mut levels, label)
        } else {
            flat_path(&headers[0], label)
        };

        for (position, value) in record.values().enumerate().skip(1) {
            if value.is_null() {
                continue;
            }
            let Some(Some(column)) = headers.get(position) else {
                continue;
            };
            let mut segments = path.clone();
            segments.push(column.clone());
            segments.push(value.to_string());
            facts.push(segments.join(SEGMENT_SEPARATOR));
        }
    }
    facts
}

fn indented_path(levels: &mut LevelMap, label: &CellValue) -> Vec<String> {
    if label.is_null() {
        return levels.current_path();
    }
    let label = label.to_string();
    let path = levels.path(&label);
    levels.record(&label);
    path
}

fn flat_path(group: &Option<String>, label: &CellValue) -> Vec<String> {
    group
        .iter()
        .cloned()
        .chain((!label.is_null()).then(|| label.to_string()))
        .collect()
}

/// Flattens every dataset in order into a single fact list.
pub fn flatten(datasets: &[Vec<Record>], heuristics: &Heuristics) -> Vec<String> {
    datasets
        .iter()
        .flat_map(|records| flatten_dataset(records, heuristics))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::materialize::materialize;
    use crate::inference::DatasetDescriptor;
    use crate::inference::FieldIndices;
    use crate::spreadsheet::Worksheet;
    use chrono::NaiveDate;

    fn records(rows: Vec<Vec<CellValue>>) -> Vec<Record> {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let sheet = Worksheet::from_rows("Sheet1", rows);
        let descriptor = DatasetDescriptor::new(0, FieldIndices::from((0..width).collect::<Vec<_>>()));
        materialize(&sheet, &descriptor).unwrap()
    }

    #[test]
    fn indentation_counts_leading_whitespace() {
        assert_eq!(indentation("Cash"), 0);
        assert_eq!(indentation("    Cash "), 4);
        assert_eq!(indentation("\t Cash"), 2);
        assert_eq!(indentation("   "), 3);
    }

    #[test]
    fn flat_layout_prefixes_header_label() {
        let dataset = records(vec![
            vec![CellValue::from("Item"), CellValue::from("Q1 2023"), CellValue::from("Q2 2023")],
            vec![CellValue::from("Cash"), CellValue::from(100.0), CellValue::from(110.0)],
            vec![CellValue::from("Debt"), CellValue::Null, CellValue::from(50.0)],
        ]);
        assert_eq!(flatten_dataset(&dataset, &Heuristics::default()), vec![
            "Item > Cash > Q1 2023 > 100",
            "Item > Cash > Q2 2023 > 110",
            "Item > Debt > Q2 2023 > 50",
        ]);
    }

    #[test]
    fn date_headers_use_display_format() {
        let period = NaiveDate::from_ymd_opt(2023, 10, 31).unwrap();
        let dataset = records(vec![
            vec![CellValue::from("BALANCE SHEET"), CellValue::from(period)],
            vec![CellValue::from("Cash & Due from Banks"), CellValue::from(70778000.0)],
        ]);
        assert_eq!(flatten_dataset(&dataset, &Heuristics::default()), vec![
            "BALANCE SHEET > Cash & Due from Banks > October 31, 2023 > 70778000",
        ]);
    }

    #[test]
    fn indented_labels_build_a_hierarchy() {
        let dataset = records(vec![
            vec![CellValue::Null, CellValue::from("2023")],
            vec![CellValue::from("Assets"), CellValue::Null],
            vec![CellValue::from("  Cash"), CellValue::from(5.0)],
            vec![CellValue::from("    Petty"), CellValue::from(1.5)],
            vec![CellValue::from("  Receivables"), CellValue::from(7.0)],
            vec![CellValue::from("Liabilities"), CellValue::from(3.0)],
        ]);
        assert_eq!(flatten_dataset(&dataset, &Heuristics::default()), vec![
            "Assets > Cash > 2023 > 5",
            "Assets > Cash > Petty > 2023 > 1.5",
            "Assets > Receivables > 2023 > 7",
            "Liabilities > 2023 > 3",
        ]);
    }

    #[test]
    fn deeper_levels_are_not_forgotten() {
        let mut levels = LevelMap::default();
        levels.record("Assets");
        levels.record("    Petty");
        assert_eq!(levels.path("  Cash"), vec!["Assets", "Cash"]);
        assert_eq!(levels.path("      Coins"), vec!["Assets", "Petty", "Coins"]);
        assert_eq!(levels.current_path(), vec!["Assets", "Petty"]);

        levels.record("Liabilities");
        assert_eq!(levels.current_path(), vec!["Liabilities"]);
    }

    #[test]
    fn unlabelled_rows_stay_under_the_last_label() {
        let dataset = records(vec![
            vec![CellValue::Null, CellValue::from("2023")],
            vec![CellValue::from("Assets"), CellValue::Null],
            vec![CellValue::from("  Cash"), CellValue::from(5.0)],
            vec![CellValue::from("Liabilities"), CellValue::from(3.0)],
            vec![CellValue::Null, CellValue::from(9.0)],
        ]);
        assert_eq!(flatten_dataset(&dataset, &Heuristics::default()), vec![
            "Assets > Cash > 2023 > 5",
            "Liabilities > 2023 > 3",
            "Liabilities > 2023 > 9",
        ]);
    }

    #[test]
    fn unlabelled_first_row_has_no_path() {
        let dataset = records(vec![
            vec![CellValue::Null, CellValue::from("2023")],
            vec![CellValue::Null, CellValue::from(4.0)],
        ]);
        assert_eq!(flatten_dataset(&dataset, &Heuristics::default()), vec!["2023 > 4"]);
    }

    #[test]
    fn label_header_is_not_reformatted() {
        let period = NaiveDate::from_ymd_opt(2023, 1, 28).unwrap();
        let dataset = records(vec![
            vec![CellValue::from(period), CellValue::from(period)],
            vec![CellValue::from("Cash"), CellValue::from(1.0)],
        ]);
        assert_eq!(flatten_dataset(&dataset, &Heuristics::default()), vec![
            "2023-01-28 00:00:00 > Cash > January 28, 2023 > 1",
        ]);
    }

    #[test]
    fn nulls_produce_nothing() {
        let dataset = records(vec![
            vec![CellValue::from("Item"), CellValue::Null, CellValue::from("Q2")],
            vec![CellValue::from("Cash"), CellValue::from(1.0), CellValue::Null],
            vec![CellValue::Null, CellValue::Null, CellValue::from(2.0)],
        ]);
        assert_eq!(flatten_dataset(&dataset, &Heuristics::default()), vec!["Item > Q2 > 2"]);
    }

    #[test]
    fn header_only_or_empty_datasets_produce_nothing() {
        let header_only = records(vec![vec![CellValue::from("Item"), CellValue::from("Q1")]]);
        assert!(flatten_dataset(&header_only, &Heuristics::default()).is_empty());
        assert!(flatten(&[Vec::new(), header_only], &Heuristics::default()).is_empty());
    }
}
