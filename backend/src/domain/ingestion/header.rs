//! Header validation for uploaded sheets.
//!
//! The first row must name the ten record columns in a fixed order. Names
//! are compared after trimming surrounding whitespace and ignoring case.

use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

/// Column names expected in the header row, in order.
pub const EXPECTED_HEADERS: [&str; 10] = [
    "first_name",
    "last_name",
    "company_name",
    "address",
    "city",
    "county",
    "postal",
    "phone",
    "email",
    "web",
];

/// The header row does not match the record schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaMismatch {
    /// The header has the wrong number of columns.
    #[error("invalid number of columns: expected {expected} but got {actual}")]
    ColumnCount {
        /// Number of expected columns.
        expected: usize,
        /// Number of columns found.
        actual: usize,
    },
    /// A column name differs from the expected one.
    #[error("incorrect header '{header}' at position {position}; expected '{expected}'")]
    Header {
        /// Header text as uploaded.
        header: String,
        /// Zero-based column position.
        position: usize,
        /// Name expected at that position.
        expected: &'static str,
    },
}

impl SchemaMismatch {
    /// Structured details for error payloads.
    pub fn details(&self) -> Value {
        match self {
            Self::ColumnCount { expected, actual } => {
                json!({ "expected": expected, "actual": actual })
            }
            Self::Header {
                header,
                position,
                expected,
            } => json!({ "header": header, "position": position, "expected": expected }),
        }
    }
}

/// Check the header row against [`EXPECTED_HEADERS`].
///
/// # Examples
/// ```
/// use records::domain::ingestion::{SchemaMismatch, validate_header};
///
/// let header = [
///     " First_Name ", "last_name", "COMPANY_NAME", "address", "city",
///     "county", "postal", "phone", "email", "web",
/// ];
/// assert!(validate_header(&header).is_ok());
///
/// let err = validate_header(&header[..9]).unwrap_err();
/// assert_eq!(err, SchemaMismatch::ColumnCount { expected: 10, actual: 9 });
/// ```
pub fn validate_header<S: AsRef<str>>(header: &[S]) -> Result<(), SchemaMismatch> {
    if header.len() != EXPECTED_HEADERS.len() {
        return Err(SchemaMismatch::ColumnCount {
            expected: EXPECTED_HEADERS.len(),
            actual: header.len(),
        });
    }

    for (position, (actual, expected)) in header.iter().zip(EXPECTED_HEADERS).enumerate() {
        let normalized = actual.as_ref().trim().to_lowercase();
        debug!(position, header = %normalized, expected, "comparing header column");
        if normalized != expected {
            return Err(SchemaMismatch::Header {
                header: actual.as_ref().to_owned(),
                position,
                expected,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn expected_owned() -> Vec<String> {
        EXPECTED_HEADERS.iter().map(|name| (*name).to_owned()).collect()
    }

    #[rstest]
    #[case(expected_owned())]
    #[case(EXPECTED_HEADERS.iter().map(|name| name.to_uppercase()).collect())]
    #[case(EXPECTED_HEADERS.iter().map(|name| format!("  {name}\t")).collect())]
    fn accepts_case_and_whitespace_variants(#[case] header: Vec<String>) {
        assert!(validate_header(&header).is_ok());
    }

    #[rstest]
    #[case(0)]
    #[case(9)]
    #[case(11)]
    fn rejects_wrong_column_count(#[case] width: usize) {
        let header: Vec<String> = (0..width).map(|idx| format!("col{idx}")).collect();
        let err = validate_header(&header).expect_err("count mismatch");
        assert_eq!(
            err,
            SchemaMismatch::ColumnCount {
                expected: 10,
                actual: width
            }
        );
        assert_eq!(
            err.to_string(),
            format!("invalid number of columns: expected 10 but got {width}")
        );
    }

    #[rstest]
    fn rejects_first_mismatched_name() {
        let mut header = expected_owned();
        header[0] = "first".to_owned();
        let err = validate_header(&header).expect_err("name mismatch");
        assert_eq!(
            err,
            SchemaMismatch::Header {
                header: "first".to_owned(),
                position: 0,
                expected: "first_name",
            }
        );
        assert_eq!(
            err.to_string(),
            "incorrect header 'first' at position 0; expected 'first_name'"
        );
    }

    #[rstest]
    fn company_column_uses_company_name() {
        let mut header = expected_owned();
        header[2] = "company".to_owned();
        let err = validate_header(&header).expect_err("company mismatch");
        assert!(matches!(
            err,
            SchemaMismatch::Header {
                position: 2,
                expected: "company_name",
                ..
            }
        ));
    }

    #[rstest]
    fn details_name_offending_column() {
        let err = SchemaMismatch::Header {
            header: "first".to_owned(),
            position: 0,
            expected: "first_name",
        };
        assert_eq!(
            err.details(),
            json!({ "header": "first", "position": 0, "expected": "first_name" })
        );
    }
}
