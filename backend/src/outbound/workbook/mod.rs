//! `.xlsx` decoding with calamine.
//!
//! Only the first sheet is read. Cells are rendered with calamine's
//! `Display` implementation, so numeric cells such as phone numbers arrive
//! without a trailing `.0` and empty cells become empty strings.
//!
//! calamine trims a sheet to its first used cell. Rows and columns above and
//! left of it are restored as empty cells so the header is always row 1,
//! column A, and row numbers match what a spreadsheet shows.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use tracing::debug;

use crate::domain::ports::{SheetRows, WorkbookReadError, WorkbookReader};

/// Workbook reader backed by calamine.
#[derive(Debug, Default, Clone, Copy)]
pub struct CalamineWorkbookReader;

impl CalamineWorkbookReader {
    /// Create a reader.
    pub fn new() -> Self {
        Self
    }
}

fn render_row(row: &[Data], left_pad: usize) -> Vec<String> {
    let mut cells = vec![String::new(); left_pad];
    cells.extend(row.iter().map(ToString::to_string));
    cells
}

fn trim_trailing_empty(mut cells: Vec<String>) -> Vec<String> {
    while cells.last().is_some_and(|cell| cell.trim().is_empty()) {
        cells.pop();
    }
    cells
}

impl WorkbookReader for CalamineWorkbookReader {
    fn read_first_sheet(&self, bytes: &[u8]) -> Result<SheetRows, WorkbookReadError> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
            .map_err(|err| WorkbookReadError::unreadable(err.to_string()))?;

        let sheet_names = workbook.sheet_names();
        let Some(first) = sheet_names.first() else {
            return Err(WorkbookReadError::no_sheets());
        };

        let range = workbook
            .worksheet_range(first)
            .map_err(|err| WorkbookReadError::rows(err.to_string()))?;

        let (top, left) = range.start().unwrap_or((0, 0));
        let (top, left) = (top as usize, left as usize);
        let width = left + range.width();
        let mut rows = std::iter::repeat_with(|| vec![String::new(); width])
            .take(top)
            .chain(range.rows().map(|row| render_row(row, left)));
        let Some(header) = rows.next() else {
            return Err(WorkbookReadError::empty());
        };

        let sheet = SheetRows {
            header: trim_trailing_empty(header),
            rows: rows.collect(),
        };
        debug!(
            sheet = %first,
            columns = sheet.header.len(),
            rows = sheet.rows.len(),
            "workbook decoded"
        );
        Ok(sheet)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use rust_xlsxwriter::Workbook;

    use crate::domain::ingestion::{EXPECTED_HEADERS, validate_header};

    fn build_workbook(rows: &[&[&str]]) -> Vec<u8> {
        build_workbook_at(0, 0, rows)
    }

    fn build_workbook_at(top: u32, left: u16, rows: &[&[&str]]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (row_idx, row) in rows.iter().enumerate() {
            for (col_idx, value) in row.iter().enumerate() {
                sheet
                    .write_string(
                        top + u32::try_from(row_idx).expect("row fits"),
                        left + u16::try_from(col_idx).expect("column fits"),
                        *value,
                    )
                    .expect("cell written");
            }
        }
        workbook.save_to_buffer().expect("workbook serializes")
    }

    #[rstest]
    fn reads_header_and_rows_from_first_sheet() {
        let bytes = build_workbook(&[
            &["first_name", "last_name"],
            &["Ada", "Lovelace"],
            &["Grace", "Hopper"],
        ]);

        let sheet = CalamineWorkbookReader::new()
            .read_first_sheet(&bytes)
            .expect("sheet reads");

        assert_eq!(sheet.header, vec!["first_name", "last_name"]);
        assert_eq!(
            sheet.rows,
            vec![vec!["Ada", "Lovelace"], vec!["Grace", "Hopper"]]
        );
    }

    #[rstest]
    fn numeric_cells_render_without_fraction() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "phone").expect("header written");
        sheet.write_number(1, 0, 5_551_234.0).expect("number written");
        let bytes = workbook.save_to_buffer().expect("workbook serializes");

        let rows = CalamineWorkbookReader::new()
            .read_first_sheet(&bytes)
            .expect("sheet reads");

        assert_eq!(rows.rows, vec![vec!["5551234"]]);
    }

    #[rstest]
    fn rows_keep_full_sheet_width() {
        let bytes = build_workbook(&[&["a", "b", "c"], &["1"]]);
        let sheet = CalamineWorkbookReader::new()
            .read_first_sheet(&bytes)
            .expect("sheet reads");
        assert_eq!(sheet.rows, vec![vec!["1", "", ""]]);
    }

    #[rstest]
    #[case::below_an_empty_first_row(1, 0)]
    #[case::right_of_an_empty_first_column(0, 1)]
    #[case::at_b2(1, 1)]
    fn header_away_from_a1_fails_validation(#[case] top: u32, #[case] left: u16) {
        let bytes = build_workbook_at(
            top,
            left,
            &[&EXPECTED_HEADERS, &["Ada", "Lovelace"]],
        );

        let sheet = CalamineWorkbookReader::new()
            .read_first_sheet(&bytes)
            .expect("sheet reads");

        assert!(validate_header(&sheet.header).is_err());
        let data_rows = usize::try_from(top).expect("row fits") + 1;
        assert_eq!(sheet.rows.len(), data_rows);
        let first_name = sheet.rows.last().expect("data row")[usize::from(left)].as_str();
        assert_eq!(first_name, "Ada");
    }

    #[rstest]
    fn header_at_b2_leaves_row_one_empty() {
        let bytes = build_workbook_at(1, 1, &[&["first_name", "last_name"]]);

        let sheet = CalamineWorkbookReader::new()
            .read_first_sheet(&bytes)
            .expect("sheet reads");

        assert!(sheet.header.is_empty());
        assert_eq!(sheet.rows, vec![vec!["", "first_name", "last_name"]]);
    }

    #[rstest]
    fn header_drops_trailing_empty_cells() {
        assert_eq!(
            trim_trailing_empty(vec!["a".to_owned(), String::new(), " ".to_owned()]),
            vec!["a"]
        );
    }

    #[rstest]
    fn garbage_bytes_are_unreadable() {
        let err = CalamineWorkbookReader::new()
            .read_first_sheet(b"definitely not a zip archive")
            .expect_err("garbage rejected");
        assert!(matches!(err, WorkbookReadError::Unreadable { .. }));
    }

    #[rstest]
    fn empty_sheet_is_reported() {
        let mut workbook = Workbook::new();
        workbook.add_worksheet();
        let bytes = workbook.save_to_buffer().expect("workbook serializes");

        let err = CalamineWorkbookReader::new()
            .read_first_sheet(&bytes)
            .expect_err("empty sheet rejected");
        assert_eq!(err, WorkbookReadError::Empty);
    }
}
