//! Contact record entity.
//!
//! The durable store assigns [`RecordId`] values on creation. Everything else
//! is free text: no trimming, no coercion, empty strings allowed.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Store-assigned record identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Wrap a raw identifier.
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The mutable fields of a record, in spreadsheet column order.
///
/// Also serves as the draft handed to bulk creation before identifiers
/// exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecordFields {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Company name.
    pub company: String,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// County.
    pub county: String,
    /// Postal code.
    pub postal: String,
    /// Phone number.
    pub phone: String,
    /// Email address.
    pub email: String,
    /// Website.
    pub web: String,
}

/// A persisted record.
///
/// # Examples
/// ```
/// use records::domain::{Record, RecordFields, RecordId};
///
/// let record = Record::new(
///     RecordId::new(4),
///     RecordFields { first_name: "Ada".into(), ..RecordFields::default() },
/// );
/// let json = serde_json::to_value(&record).unwrap();
/// assert_eq!(json["id"], 4);
/// assert_eq!(json["first_name"], "Ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Record {
    id: RecordId,
    #[serde(flatten)]
    fields: RecordFields,
}

impl Record {
    /// Assemble a record from its identifier and fields.
    pub fn new(id: RecordId, fields: RecordFields) -> Self {
        Self { id, fields }
    }

    /// Identifier assigned by the durable store.
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Field values.
    pub fn fields(&self) -> &RecordFields {
        &self.fields
    }

    /// Replace every mutable field, keeping the identifier.
    #[must_use]
    pub fn with_fields(self, fields: RecordFields) -> Self {
        Self {
            id: self.id,
            fields,
        }
    }
}
