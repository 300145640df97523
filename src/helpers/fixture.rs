//! Minimal `.xlsx` packages written with the zip writer, for reader and processor tests.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#;

/// Style 0 is general, style 1 the built-in short date, style 2 a custom date format.
const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<numFmts count="1"><numFmt numFmtId="164" formatCode="mmm\ d\,\ yyyy"/></numFmts>
<cellStyleXfs count="1"><xf numFmtId="0"/></cellStyleXfs>
<cellXfs count="3"><xf numFmtId="0" xfId="0"/><xf numFmtId="14" xfId="0" applyNumberFormat="1"/><xf numFmtId="164" xfId="0" applyNumberFormat="1"/></cellXfs>
</styleSheet>"#;

/// A workbook described by its shared strings and raw `<sheetData>` bodies.
pub(crate) struct WorkbookFixture {
    pub(crate) shared_strings: Vec<&'static str>,
    pub(crate) sheets: Vec<(&'static str, String)>,
}

impl WorkbookFixture {
    /// A two-sheet statement: a dated balance sheet followed by a one-cell notes sheet.
    pub(crate) fn balance_sheet() -> Self {
        let balance = [
            r#"<row r="1"><c r="A1" t="s"><v>0</v></c><c r="B1" s="1"><v>45230</v></c><c r="C1" t="d"><v>2021-03-31T00:00:00</v></c></row>"#,
            r#"<row r="2"><c r="A2" t="s"><v>1</v></c><c r="B2"><v>70778000</v></c><c r="C2" s="0"><v>136000</v></c></row>"#,
            r#"<row r="3"><c r="A3" t="s"><v>2</v></c><c r="C3"><v>500</v></c></row>"#,
            r#"<row r="4"><c r="A4" t="inlineStr"><is><t>Inline</t></is></c><c r="C4" t="e"><v>#DIV/0!</v></c></row>"#,
        ]
        .concat();
        let notes = r#"<row r="1"><c r="A1" t="inlineStr"><is><t>Notes</t></is></c></row>"#.to_owned();
        WorkbookFixture {
            shared_strings: vec![
                "<t>BALANCE SHEET</t>",
                r#"<t xml:space="preserve">  Cash &amp; Due from Banks</t>"#,
                "<r><t>Short-term </t></r><r><t>Investments</t></r><rPh sb=\"0\" eb=\"1\"><t>ignored</t></rPh>",
            ],
            sheets: vec![("Balance Sheet", balance), ("Notes", notes)],
        }
    }

    /// Writes the package to `path`.
    pub(crate) fn write(&self, path: &Path) -> zip::result::ZipResult<()> {
        let mut zip = ZipWriter::new(File::create(path)?);
        let options = SimpleFileOptions::default();

        let mut sheets = String::new();
        let mut relationships = String::new();
        for (index, (name, _)) in self.sheets.iter().enumerate() {
            let id = index + 1;
            sheets.push_str(&format!(r#"<sheet name="{name}" sheetId="{id}" r:id="rId{id}"/>"#));
            relationships.push_str(&format!(
                r#"<Relationship Id="rId{id}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{id}.xml"/>"#
            ));
        }
        relationships.push_str(
            r#"<Relationship Id="rIdStyles" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
        );

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(CONTENT_TYPES.as_bytes())?;

        zip.start_file("xl/workbook.xml", options)?;
        zip.write_all(format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><workbookPr date1904="false"/><sheets>{sheets}</sheets></workbook>"#
        ).as_bytes())?;

        zip.start_file("xl/_rels/workbook.xml.rels", options)?;
        zip.write_all(format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{relationships}</Relationships>"#
        ).as_bytes())?;

        zip.start_file("xl/styles.xml", options)?;
        zip.write_all(STYLES.as_bytes())?;

        let items: String = self.shared_strings.iter().map(|item| format!("<si>{item}</si>")).collect();
        zip.start_file("xl/sharedStrings.xml", options)?;
        zip.write_all(format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{count}" uniqueCount="{count}">{items}</sst>"#,
            count = self.shared_strings.len()
        ).as_bytes())?;

        for (index, (_, rows)) in self.sheets.iter().enumerate() {
            zip.start_file(format!("xl/worksheets/sheet{}.xml", index + 1), options)?;
            zip.write_all(format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{rows}</sheetData></worksheet>"#
            ).as_bytes())?;
        }

        zip.finish()?;
        Ok(())
    }
}
