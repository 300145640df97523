use crate::inference::DatasetDescriptor;
use crate::inference::InferenceError;
use crate::spreadsheet::CellValue;
use crate::spreadsheet::Worksheet;
use serde::ser::SerializeMap;
use serde::Serialize;
use serde::Serializer;

/// One row of a dataset restricted to the dataset's columns, in field order.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// (column index, value) pairs
    fields: Vec<(usize, CellValue)>,
}

impl Record {
    /// The value at `position` in field order, null past the end.
    pub fn get(&self, position: usize) -> &CellValue {
        static NULL: CellValue = CellValue::Null;
        self.fields.get(position).map(|(_, value)| value).unwrap_or(&NULL)
    }

    pub fn values(&self) -> impl Iterator<Item = &CellValue> + '_ {
        self.fields.iter().map(|(_, value)| value)
    }

    /// Stable key of each field: the 1-based column number.
    pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
        self.fields.iter().map(|(col, _)| (col + 1).to_string())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether every value of the record is null.
    pub fn is_blank(&self) -> bool {
        self.values().all(CellValue::is_null)
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in self.keys().zip(self.values()) {
            map.serialize_entry(&key, value)?;
        }
        map.end()
    }
}

/// Builds the non-blank records of one dataset, header row first.
pub fn materialize(sheet: &Worksheet, descriptor: &DatasetDescriptor) -> Result<Vec<Record>, InferenceError> {
    if descriptor.fields.is_empty() {
        Err(InferenceError::EmptyFieldSet {
            start_row: descriptor.start_row,
        })?
    }
    let end_row = descriptor.end_or(sheet.len());
    let records = (descriptor.start_row..end_row)
        .map(|row| Record {
            fields: descriptor
                .fields
                .iter()
                .map(|col| (col, sheet.cell(row, col).clone()))
                .collect(),
        })
        .filter(|record| !record.is_blank())
        .collect();
    Ok(records)
}

/// Materializes every dataset, in descriptor order.
pub fn materialize_all(sheet: &Worksheet, descriptors: &[DatasetDescriptor]) -> Result<Vec<Vec<Record>>, InferenceError> {
    descriptors
        .iter()
        .map(|descriptor| materialize(sheet, descriptor))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::FieldIndices;

    fn sheet() -> Worksheet {
        Worksheet::from_rows("Sheet1", vec![
            vec![CellValue::from("Item"), CellValue::from("Q1"), CellValue::from("Q2")],
            vec![CellValue::from("Cash"), CellValue::from(100.0), CellValue::from(110.0)],
            vec![CellValue::Null, CellValue::Null, CellValue::Null],
            vec![CellValue::from("Debt"), CellValue::Null],
            vec![CellValue::from("Other"), CellValue::from(1.0), CellValue::from(2.0)],
        ])
    }

    #[test]
    fn blank_rows_are_dropped_and_short_rows_read_null() {
        let mut descriptor = DatasetDescriptor::new(0, FieldIndices::from(vec![0, 1, 2]));
        descriptor.end_row = Some(4);
        let records = materialize(&sheet(), &descriptor).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[2].get(0), &CellValue::from("Debt"));
        assert!(records[2].get(2).is_null());
        assert!(records.iter().all(|record| !record.is_blank()));
    }

    #[test]
    fn open_dataset_runs_to_sheet_end() {
        let descriptor = DatasetDescriptor::new(1, FieldIndices::from(vec![1, 2]));
        let records = materialize(&sheet(), &descriptor).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get(0), &CellValue::Number(1.0));
    }

    #[test]
    fn records_serialize_with_one_based_keys() {
        let descriptor = DatasetDescriptor::new(1, FieldIndices::from(vec![0, 2]));
        let records = materialize(&sheet(), &descriptor).unwrap();
        let json = serde_json::to_string(&records[0]).unwrap();

        assert_eq!(json, r#"{"1":"Cash","3":110.0}"#);
    }

    #[test]
    fn empty_field_set_is_fatal() {
        let descriptor = DatasetDescriptor::new(2, FieldIndices::default());
        assert!(matches!(
            materialize_all(&sheet(), &[descriptor]),
            Err(InferenceError::EmptyFieldSet { start_row: 2 })
        ));
    }
}
