//! Positional mapping from sheet rows to record drafts.

use tracing::warn;

use crate::domain::RecordFields;

/// Why a row produced no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRejection {
    /// The row has fewer fields than the header.
    OutOfRange {
        /// Number of fields present.
        fields: usize,
    },
    /// Every cell in the row is empty.
    Blank,
}

/// A row that was skipped during transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedRow {
    /// One-based sheet row number, counting the header as row 1.
    pub row: usize,
    /// Reason the row was skipped.
    pub rejection: RowRejection,
}

/// Result of transforming the data rows of a sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformedRows {
    /// One draft per accepted row, in sheet order.
    pub drafts: Vec<RecordFields>,
    /// Rows that were skipped.
    pub skipped: Vec<SkippedRow>,
}

/// Map each data row onto a [`RecordFields`] by column position.
///
/// Short rows are skipped and reported rather than failing the batch; fields
/// beyond the tenth are ignored. Values are copied verbatim.
///
/// A row whose cells are all empty strings is skipped as
/// [`RowRejection::Blank`] instead of being stored as an empty record, so the
/// number of records stored can be lower than the number of full-width rows.
/// Rows with at least one non-empty cell keep their empty fields.
pub fn transform_rows<R, S>(rows: &[R]) -> TransformedRows
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut out = TransformedRows::default();
    for (index, row) in rows.iter().enumerate() {
        // Header occupies sheet row 1.
        let row_number = index + 2;
        match map_row(row.as_ref()) {
            Ok(draft) => out.drafts.push(draft),
            Err(rejection) => {
                warn!(row = row_number, ?rejection, "skipping spreadsheet row");
                out.skipped.push(SkippedRow {
                    row: row_number,
                    rejection,
                });
            }
        }
    }
    out
}

fn map_row<S: AsRef<str>>(row: &[S]) -> Result<RecordFields, RowRejection> {
    if row.iter().all(|cell| cell.as_ref().is_empty()) {
        return Err(RowRejection::Blank);
    }
    let [
        first_name,
        last_name,
        company,
        address,
        city,
        county,
        postal,
        phone,
        email,
        web,
        ..,
    ] = row
    else {
        return Err(RowRejection::OutOfRange { fields: row.len() });
    };

    Ok(RecordFields {
        first_name: first_name.as_ref().to_owned(),
        last_name: last_name.as_ref().to_owned(),
        company: company.as_ref().to_owned(),
        address: address.as_ref().to_owned(),
        city: city.as_ref().to_owned(),
        county: county.as_ref().to_owned(),
        postal: postal.as_ref().to_owned(),
        phone: phone.as_ref().to_owned(),
        email: email.as_ref().to_owned(),
        web: web.as_ref().to_owned(),
    })
}
