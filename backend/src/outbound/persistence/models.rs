//! Diesel row structs for the `records` table.

use diesel::prelude::*;

use super::schema::records;
use crate::domain::{Record, RecordFields, RecordId};

/// Row as read from `records`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecordRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub address: String,
    pub city: String,
    pub county: String,
    pub postal: String,
    pub phone: String,
    pub email: String,
    pub web: String,
}

impl From<RecordRow> for Record {
    fn from(row: RecordRow) -> Self {
        Record::new(
            RecordId::new(row.id),
            RecordFields {
                first_name: row.first_name,
                last_name: row.last_name,
                company: row.company,
                address: row.address,
                city: row.city,
                county: row.county,
                postal: row.postal,
                phone: row.phone,
                email: row.email,
                web: row.web,
            },
        )
    }
}

/// Column values for inserts and full-row updates.
#[derive(Debug, Insertable, AsChangeset)]
#[diesel(table_name = records)]
pub(crate) struct RecordValues<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub company: &'a str,
    pub address: &'a str,
    pub city: &'a str,
    pub county: &'a str,
    pub postal: &'a str,
    pub phone: &'a str,
    pub email: &'a str,
    pub web: &'a str,
}

impl<'a> From<&'a RecordFields> for RecordValues<'a> {
    fn from(fields: &'a RecordFields) -> Self {
        Self {
            first_name: &fields.first_name,
            last_name: &fields.last_name,
            company: &fields.company,
            address: &fields.address,
            city: &fields.city,
            county: &fields.county,
            postal: &fields.postal,
            phone: &fields.phone,
            email: &fields.email,
            web: &fields.web,
        }
    }
}
