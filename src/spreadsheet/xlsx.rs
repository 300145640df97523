use crate::error::SheetFactsError;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::xml::XmlReader;
use crate::helpers::xml::XmlTextContextHelper;
use crate::helpers::zip::ZipHelper;
use crate::match_xml_events;
use crate::spreadsheet::cell::CellType;
use crate::spreadsheet::criteria::Criteria;
use crate::spreadsheet::excel;
use crate::spreadsheet::reference::index_to_reference;
use crate::spreadsheet::reference::reference_to_index;
use crate::spreadsheet::sheet::SheetBuilder;
use crate::spreadsheet::sheet::Worksheet;
use crate::spreadsheet::Spreadsheet;
use crate::spreadsheet::SpreadsheetError;
use log::debug;
use quick_xml::events::Event;
use quick_xml::name::QName;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use zip::read::ZipFile;
use zip::ZipArchive;

// XML tag names of the SpreadsheetML parts
const TAG_CUSTOM_FORMATS: QName = QName(b"numFmts"); // Custom number formats container
const TAG_CUSTOM_FORMAT: QName = QName(b"numFmt");   // Individual custom number format
const TAG_FORMAT_INDEXES: QName = QName(b"cellXfs");  // Cell format indexes container
const TAG_FORMAT_INDEX: QName = QName(b"xf");         // Individual cell format
const TAG_SHARED_STRING_ITEM: QName = QName(b"si");   // Shared string table item
const TAG_PHONETIC_TEXT: QName = QName(b"rPh");       // Phonetic run, not part of the value
const TAG_TEXT: QName = QName(b"t");                  // Text content within strings
const TAG_WORKBOOK_PROPERTIES: QName = QName(b"workbookPr");
const TAG_SHEET: QName = QName(b"sheet");
const TAG_ROW: QName = QName(b"row");
const TAG_CELL: QName = QName(b"c");
const TAG_INLINE_STRING: QName = QName(b"is");
const TAG_VALUE: QName = QName(b"v");

type PartReader<'a> = XmlReader<BufReader<ZipFile<'a, BufReader<File>>>>;

/// An Excel 2007+ workbook (`.xlsx`, `.xlsm`) opened from disk.
pub(crate) struct XlsxSpreadsheet {
    /// File name of the workbook
    name: String,
    /// Zipped package
    zip: ZipArchive<BufReader<File>>,
    /// Cell type implied by each cell format, indexed by style ID
    number_formats: Vec<CellType>,
    /// Worksheets as (name, part path), in workbook order
    sheets: Vec<(String, String)>,
}

impl XlsxSpreadsheet {
    /// Opens the package and loads its sheet list and number formats.
    pub(crate) fn open(path: &Path) -> Result<XlsxSpreadsheet, SheetFactsError> {
        let name = path.display().to_string();
        let mut zip = ZipArchive::new(BufReader::new(File::open(path)?))?;
        let (sheets, is_1904) = load_workbook(&mut zip)?;
        if sheets.is_empty() {
            Err(SpreadsheetError::SpreadsheetEmptyError(name.to_owned()))?
        }
        let number_formats = load_number_formats(&mut zip, is_1904)?;
        debug!("opened '{}' with {} sheet(s), 1904 dates: {}", name, sheets.len(), is_1904);
        Ok(XlsxSpreadsheet {
            name,
            zip,
            number_formats,
            sheets,
        })
    }

    /// Loads the whole shared string table.
    fn load_shared_strings(&mut self) -> Result<Vec<String>, SheetFactsError> {
        let mut shared_strings = Vec::<String>::new();
        let mut reader = match self.zip.xml_reader("xl/sharedStrings.xml")? {
            Some(reader) => reader,
            None => return Ok(shared_strings),
        };
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_SHARED_STRING_ITEM => {
                shared_strings.push(read_string_value(&mut reader, TAG_SHARED_STRING_ITEM, false)?);
            }
        });
        Ok(shared_strings)
    }
}

impl Spreadsheet for XlsxSpreadsheet {
    fn name(&self) -> String {
        self.name.to_owned()
    }

    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.to_owned()).collect()
    }

    /// Reads the first worksheet accepted by `criteria` into a dense grid.
    fn read_worksheet(&mut self, criteria: &Criteria) -> Result<Worksheet, SheetFactsError> {
        let (sheet_name, zip_path) = self
            .sheets
            .iter()
            .find(|(sheet_name, _)| criteria.accept(sheet_name))
            .cloned()
            .ok_or_else(|| SpreadsheetError::SheetNotFound(self.name.to_owned()))?;
        let shared_strings = self.load_shared_strings()?;

        let mut sheet = SheetBuilder::new(&sheet_name);
        let mut row_count = 0usize;
        let mut col_count = 0usize;
        let mut row = 0usize;
        let mut col = 0usize;
        let mut kind = CellType::default();
        let mut value = String::new();
        let mut reader = self
            .zip
            .xml_reader(&zip_path)?
            .ok_or_else(|| SpreadsheetError::MissingPartError(zip_path.to_owned()))?;
        match_xml_events!(reader => {
            Event::Start(event) if event.name() == TAG_ROW => {
                if let Some(number) = event.get_attribute_value("r")? {
                    row_count = number.parse::<usize>()?.saturating_sub(1);
                }
                col_count = 0;
            }
            Event::End(event) if event.name() == TAG_ROW => {
                row_count += 1;
            }
            Event::Start(event) if event.name() == TAG_CELL => {
                (row, col) = event.get_attribute_value("r")?
                    .and_then(|reference| reference_to_index(&reference))
                    .unwrap_or((row_count, col_count));
                col_count = col + 1;
                value.clear();
                kind = event.get_attribute_value("t")?.map(|t| {
                    match t.as_ref() {
                        "inlineStr" | "str" => CellType::InlineString,
                        "s" => CellType::SharedString,
                        "d" => CellType::IsoDateTime,
                        "b" => CellType::Boolean,
                        "e" if criteria.error_as_null => CellType::Empty,
                        "e" => CellType::Error,
                        _ => CellType::Number,
                    }
                }).unwrap_or(CellType::Number);
                if let Some(format_id) = event.get_attribute_value("s")? {
                    if kind == CellType::Number && !format_id.is_empty() {
                        let index = format_id.parse::<usize>()?;
                        kind = self.number_formats.get(index).copied().unwrap_or(CellType::Number);
                    }
                }
            }
            Event::Start(event) if kind != CellType::Empty && event.name() == TAG_INLINE_STRING => {
                value = read_string_value(&mut reader, TAG_INLINE_STRING, false)?;
            }
            Event::Start(event) if kind != CellType::Empty && event.name() == TAG_VALUE => {
                value = read_string_value(&mut reader, TAG_VALUE, true)?;
            }
            Event::End(event) if event.name() == TAG_CELL => {
                if kind != CellType::Empty && !value.is_empty() {
                    let cell = kind.to_value(&value, &shared_strings).map_err(|error| {
                        SpreadsheetError::CellValueError(
                            self.name.to_owned(),
                            sheet_name.to_owned(),
                            index_to_reference(row, col),
                            error.to_string(),
                        )
                    })?;
                    sheet.push(row, col, cell);
                }
                kind = CellType::default();
                value.clear();
            }
        });

        let worksheet = sheet.finish();
        debug!("read sheet '{}' of '{}': {} row(s)", worksheet.name(), self.name, worksheet.len());
        Ok(worksheet)
    }
}

/// Reads the sheet list and date system from `xl/workbook.xml`.
///
/// # Returns
/// Tuple of (worksheets, is_1904_date_system) where worksheets are (name, zip_path) pairs
fn load_workbook(zip: &mut ZipArchive<BufReader<File>>) -> Result<(Vec<(String, String)>, bool), SheetFactsError> {
    let relationships = excel::load_relationships(zip, "xl/_rels/workbook.xml.rels")?;
    let mut reader = zip
        .xml_reader("xl/workbook.xml")?
        .ok_or_else(|| SpreadsheetError::MissingPartError("xl/workbook.xml".to_owned()))?;
    let mut sheets = Vec::<(String, String)>::new();
    let mut is_1904 = false;
    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_SHEET => {
            let mut name = None::<String>;
            let mut id = None::<String>;
            for result in event.attributes() {
                let attribute = result?;
                let key = attribute.key.local_name();
                if key.as_ref() == b"name" {
                    name = Some(attribute.unescape_value()?.to_string());
                } else if key.as_ref() == b"id" {
                    id = Some(attribute.unescape_value()?.to_string());
                }
            }
            if let Some((name, id)) = name.zip(id) {
                if let Some(path) = relationships.get(&id) {
                    sheets.push((name, path.to_owned()));
                }
            }
        }
        Event::Start(event) if event.name() == TAG_WORKBOOK_PROPERTIES => {
            is_1904 = event.get_attribute_value("date1904")?
                .map(|value| value.eq("1") || value.eq("true"))
                .unwrap_or(false);
        }
    });
    Ok((sheets, is_1904))
}

/// Loads the cell formats of `xl/styles.xml` and the cell types their number formats imply.
fn load_number_formats(zip: &mut ZipArchive<BufReader<File>>, is_1904: bool) -> Result<Vec<CellType>, SheetFactsError> {
    let mut reader = match zip.xml_reader("xl/styles.xml")? {
        Some(reader) => reader,
        None => return Ok(Vec::new()),
    };

    let mut custom_formats_context = false;
    let mut custom_formats = HashMap::<String, CellType>::new();
    let mut format_indexes_context = false;
    let mut format_indexes = Vec::<String>::new();

    match_xml_events!(reader => {
        Event::Start(event) if event.name() == TAG_CUSTOM_FORMATS => custom_formats_context = true,
        Event::End(event) if event.name() == TAG_CUSTOM_FORMATS => custom_formats_context = false,
        Event::Start(event) if custom_formats_context && event.name() == TAG_CUSTOM_FORMAT => {
            let id = event.get_attribute_value("numFmtId")?;
            let format = event.get_attribute_value("formatCode")?;
            if let Some((id, format)) = id.zip(format) {
                custom_formats.insert(id.to_string(), CellType::parse_custom_number_format(&format, is_1904));
            }
        }
        Event::Start(event) if event.name() == TAG_FORMAT_INDEXES => format_indexes_context = true,
        Event::End(event) if event.name() == TAG_FORMAT_INDEXES => break,
        Event::Start(event) if format_indexes_context && event.name() == TAG_FORMAT_INDEX => {
            let id = event.get_attribute_value("numFmtId")?.map(|id| id.to_string());
            format_indexes.push(id.unwrap_or_else(|| "0".to_owned()));
        }
    });

    Ok(excel::load_number_formats(format_indexes, custom_formats, is_1904))
}

/// Reads the text of a string item up to `end_tag`, skipping phonetic runs.
/// `is_text_content` marks elements whose direct text is the value (`<v>`).
fn read_string_value(reader: &mut PartReader<'_>, end_tag: QName, is_text_content: bool) -> Result<String, SheetFactsError> {
    let mut is_phonetic_text = false;
    let mut is_text = is_text_content;
    let mut text = String::new();
    match_xml_events!(reader => {
        Event::End(event) if event.name() == end_tag => break,
        Event::Start(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = true,
        Event::End(event) if event.name() == TAG_PHONETIC_TEXT => is_phonetic_text = false,
        Event::Start(event) if !is_phonetic_text && event.name() == TAG_TEXT => is_text = true,
        Event::End(event) if is_text && event.name() == TAG_TEXT => is_text = false,
        Event::Text(event) if is_text => text.push_str(&event.xml_content()?),
        Event::CData(event) if is_text => text.push_str(&event.xml_content()?),
        Event::GeneralRef(event) if is_text => text.push_bytes_ref(&event)?,
    });
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::fixture::WorkbookFixture;
    use crate::spreadsheet::cell::CellValue;
    use chrono::NaiveDate;

    #[test]
    fn reads_first_sheet_with_typed_cells() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("statement.xlsx");
        WorkbookFixture::balance_sheet().write(&path).unwrap();

        let mut spreadsheet = XlsxSpreadsheet::open(&path).unwrap();
        assert_eq!(spreadsheet.sheet_names(), vec!["Balance Sheet".to_owned(), "Notes".to_owned()]);

        let sheet = spreadsheet.read_worksheet(&Criteria::default()).unwrap();
        assert_eq!(sheet.name(), "Balance Sheet");
        assert_eq!(sheet.len(), 4);
        assert_eq!(sheet.cell(0, 0), &CellValue::from("BALANCE SHEET"));
        let october = NaiveDate::from_ymd_opt(2023, 10, 31).unwrap();
        assert_eq!(sheet.cell(0, 1), &CellValue::from(october));
        assert_eq!(sheet.cell(0, 2), &CellValue::from(NaiveDate::from_ymd_opt(2021, 3, 31).unwrap()));
        assert_eq!(sheet.cell(1, 0), &CellValue::from("  Cash & Due from Banks"));
        assert_eq!(sheet.cell(1, 1), &CellValue::Number(70778000.0));
        assert!(sheet.cell(2, 1).is_null());
        assert_eq!(sheet.cell(3, 0), &CellValue::from("Inline"));
        assert_eq!(sheet.cell(3, 2), &CellValue::from("#DIV/0!"));
    }

    #[test]
    fn sheet_patterns_and_error_cells() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("statement.xlsx");
        WorkbookFixture::balance_sheet().write(&path).unwrap();
        let mut spreadsheet = XlsxSpreadsheet::open(&path).unwrap();

        let mut criteria = Criteria::with_sheet_pattern("Not*").unwrap();
        assert_eq!(spreadsheet.read_worksheet(&criteria).unwrap().name(), "Notes");

        criteria = Criteria {
            error_as_null: true,
            ..Criteria::default()
        };
        assert!(spreadsheet.read_worksheet(&criteria).unwrap().cell(3, 2).is_null());

        let missing = Criteria::with_sheet_pattern("Cash Flow").unwrap();
        assert!(spreadsheet.read_worksheet(&missing).is_err());
    }
}
