//! In-memory `.xlsx` fixtures and multipart request bodies.

use records::domain::ingestion::EXPECTED_HEADERS;
use rust_xlsxwriter::Workbook;

/// Boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "records-integration-boundary";

/// Serialize a single-sheet workbook.
///
/// Rows are written from the top-left cell; a `None` row leaves that sheet
/// row empty.
pub fn workbook_bytes(rows: &[Option<&[&str]>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (row_idx, row) in rows.iter().enumerate() {
        let Some(cells) = row else { continue };
        for (col_idx, value) in cells.iter().enumerate() {
            sheet
                .write_string(
                    u32::try_from(row_idx).expect("row fits"),
                    u16::try_from(col_idx).expect("column fits"),
                    *value,
                )
                .expect("cell written");
        }
    }
    workbook.save_to_buffer().expect("workbook serializes")
}

/// The ten expected column names.
pub fn expected_header() -> Vec<&'static str> {
    EXPECTED_HEADERS.to_vec()
}

/// A full data row for a person named `first` `last`.
pub fn person_row(first: &'static str, last: &'static str) -> [&'static str; 10] {
    [
        first,
        last,
        "Analytical Engines",
        "12 St James's Square",
        "London",
        "Greater London",
        "SW1Y 4JH",
        "020 7946 0000",
        "ada@example.com",
        "https://example.com",
    ]
}

/// Wrap `bytes` as a single multipart form field named `field`.
///
/// Returns the `Content-Type` header value and the request body.
pub fn multipart_body(field: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; \
         filename=\"records.xlsx\"\r\nContent-Type: application/octet-stream\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}
