//! Port for decoding an uploaded workbook into string rows.

use super::define_port_error;

define_port_error! {
    /// Errors raised while decoding a workbook.
    pub enum WorkbookReadError {
        /// The bytes are not a readable workbook.
        Unreadable { message: String } => "unable to read workbook: {message}",
        /// The workbook has no sheets.
        NoSheets => "no sheets found in the workbook",
        /// The first sheet exists but its rows could not be read.
        Rows { message: String } => "error reading rows from workbook: {message}",
        /// The first sheet has no rows at all.
        Empty => "the first sheet contains no rows",
    }
}

/// First sheet of a workbook, rendered as strings.
///
/// `header` has trailing empty cells removed; each entry in `rows` keeps the
/// full width of the sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRows {
    /// First row of the sheet.
    pub header: Vec<String>,
    /// Every following row, in sheet order.
    pub rows: Vec<Vec<String>>,
}

/// Port for reading the first sheet of a workbook.
///
/// Decoding is CPU-bound and synchronous; callers move it off the async
/// executor.
#[cfg_attr(test, mockall::automock)]
pub trait WorkbookReader: Send + Sync {
    /// Decode `bytes` and return the first sheet.
    fn read_first_sheet(&self, bytes: &[u8]) -> Result<SheetRows, WorkbookReadError>;
}
