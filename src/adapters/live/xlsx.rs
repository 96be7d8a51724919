//! Live adapter for the `TableWriter` port producing `.xlsx` workbooks.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, FormatAlign, Workbook, Worksheet, XlsxError};

use crate::ports::table::TableWriter;
use crate::row::Row;

const SHEET_NAME: &str = "Sheet1";

/// Font applied to every written cell.
const FONT_NAME: &str = "MS UI Gothic";

/// Column whose cells wrap long, multi-line text.
const WRAPPED_COLUMN: usize = 2;

/// Writes a single-sheet Excel workbook to a fixed path.
pub struct XlsxTableWriter {
    path: PathBuf,
}

impl XlsxTableWriter {
    /// Creates a writer targeting `path`. Nothing is touched until
    /// [`TableWriter::write_table`] is called.
    #[must_use]
    pub fn new(path: &Path) -> Self {
        Self { path: path.to_path_buf() }
    }
}

impl TableWriter for XlsxTableWriter {
    fn write_table(
        &self,
        header: &[&str],
        rows: &[Row],
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut workbook = build_workbook(header, rows)
            .map_err(|e| format!("Failed to build workbook for {}: {e}", self.path.display()))?;

        if self.path.exists() {
            std::fs::remove_file(&self.path).map_err(|e| {
                format!("Failed to replace existing file {}: {e}", self.path.display())
            })?;
        }
        workbook
            .save(&self.path)
            .map_err(|e| format!("Failed to write {}: {e}", self.path.display()))?;

        tracing::info!(path = %self.path.display(), rows = rows.len(), "workbook written");
        Ok(())
    }
}

fn build_workbook(header: &[&str], rows: &[Row]) -> Result<Workbook, XlsxError> {
    let top = Format::new().set_font_name(FONT_NAME).set_align(FormatAlign::Top);
    let wrap = top.clone().set_text_wrap();

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, title) in header.iter().enumerate() {
        write_cell(sheet, 0, col, title, &top)?;
    }

    for (i, row) in rows.iter().enumerate() {
        for (col, text) in row.cells().into_iter().enumerate() {
            let format = if col == WRAPPED_COLUMN { &wrap } else { &top };
            write_cell(sheet, i + 1, col, text, format)?;
        }
    }

    sheet.autofit();
    Ok(workbook)
}

/// Writes one cell, using a formatted blank for empty text.
fn write_cell(
    sheet: &mut Worksheet,
    row: usize,
    col: usize,
    text: &str,
    format: &Format,
) -> Result<(), XlsxError> {
    let row = u32::try_from(row).map_err(|_| XlsxError::RowColumnLimitError)?;
    let col = u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)?;
    if text.is_empty() {
        sheet.write_blank(row, col, format)?;
    } else {
        sheet.write_string_with_format(row, col, text, format)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;
    use crate::row::HEADER;

    fn rows() -> Vec<Row> {
        vec![
            Row { key: "PROJ-1".into(), summary: "T1".into(), description: String::new() },
            Row { key: "PROJ-2".into(), summary: "T2".into(), description: "D\nE".into() },
        ]
    }

    fn is_zip(path: &Path) -> bool {
        std::fs::read(path).map(|bytes| bytes.starts_with(b"PK")).unwrap_or(false)
    }

    #[test]
    fn writes_workbook_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("issues.xlsx");

        XlsxTableWriter::new(&path).write_table(&HEADER, &rows()).unwrap();

        assert!(is_zip(&path));
    }

    fn read_part(path: &Path, part: &str) -> String {
        let mut archive = zip::ZipArchive::new(std::fs::File::open(path).unwrap()).unwrap();
        let mut contents = String::new();
        archive.by_name(part).unwrap().read_to_string(&mut contents).unwrap();
        contents
    }

    #[test]
    fn workbook_carries_sheet_strings_and_styles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("issues.xlsx");

        XlsxTableWriter::new(&path).write_table(&HEADER, &rows()).unwrap();

        assert!(read_part(&path, "xl/workbook.xml").contains(r#"name="Sheet1""#));

        let strings = read_part(&path, "xl/sharedStrings.xml");
        for text in ["JIRA-ID", "Summary", "Description", "PROJ-1", "PROJ-2", "T2"] {
            assert!(strings.contains(text), "missing {text} in {strings}");
        }

        let styles = read_part(&path, "xl/styles.xml");
        assert!(styles.contains(r#"<name val="MS UI Gothic"/>"#), "styles: {styles}");
        assert!(styles.contains(r#"vertical="top""#));
        assert!(styles.contains(r#"wrapText="1""#));
    }

    #[test]
    fn replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("issues.xlsx");
        std::fs::write(&path, "stale contents").unwrap();

        XlsxTableWriter::new(&path).write_table(&HEADER, &rows()).unwrap();

        assert!(is_zip(&path));
    }

    #[test]
    fn header_only_workbook_for_no_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");

        XlsxTableWriter::new(&path).write_table(&HEADER, &[]).unwrap();

        assert!(is_zip(&path));
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("issues.xlsx");

        let err = XlsxTableWriter::new(&path).write_table(&HEADER, &rows()).unwrap_err();

        assert!(err.to_string().contains("issues.xlsx"));
        assert!(!path.exists());
    }
}
