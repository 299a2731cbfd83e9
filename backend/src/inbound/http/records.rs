//! Record HTTP handlers.
//!
//! ```text
//! GET    /records?page=<int>&per_page=<int>
//! PUT    /records/{id}
//! DELETE /records/{id}
//! ```

use actix_web::{HttpResponse, delete, get, put, web};
use pagination::PageQuery;
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::UpdateRecordRequest;
use crate::domain::{Error, Record, RecordFields, RecordId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Confirmation body for a successful update.
pub const RECORD_UPDATED: &str = "Record updated successfully";
/// Confirmation body for a successful delete.
pub const RECORD_DELETED: &str = "Record deleted successfully";

/// Request payload for overwriting a record.
///
/// Every field is optional on the wire and defaults to an empty string. An
/// `id` in the body is ignored; the path identifier wins.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct RecordBody {
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

impl From<RecordBody> for RecordFields {
    fn from(body: RecordBody) -> Self {
        let RecordBody {
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
        } = body;
        Self {
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
        }
    }
}

/// List one page of records ordered by identifier.
#[utoipa::path(
    get,
    path = "/records",
    params(
        ("page" = Option<String>, Query, description = "1-based page number; defaults to 1"),
        ("per_page" = Option<String>, Query, description = "Page size; defaults to 10")
    ),
    responses(
        (status = 200, description = "Records on the requested page", body = [Record]),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Durable store unavailable", body = Error)
    ),
    tags = ["records"],
    operation_id = "listRecords"
)]
#[get("/records")]
pub async fn list_records(
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Vec<Record>>> {
    let request = query.into_inner().normalize();
    let records = state.records.list_records(request).await?;
    Ok(web::Json(records))
}

/// Overwrite every field of an existing record.
#[utoipa::path(
    put,
    path = "/records/{id}",
    params(("id" = i64, Path, description = "Record identifier")),
    request_body = RecordBody,
    responses(
        (status = 200, description = "Record updated", body = String, content_type = "text/plain"),
        (status = 400, description = "Malformed identifier or body", body = Error),
        (status = 404, description = "Record not found", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Durable store unavailable", body = Error)
    ),
    tags = ["records"],
    operation_id = "updateRecord"
)]
#[put("/records/{id}")]
pub async fn update_record(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
    payload: web::Json<RecordBody>,
) -> ApiResult<HttpResponse> {
    let id = RecordId::new(path.into_inner());
    let record = state
        .records_command
        .update_record(UpdateRecordRequest {
            id,
            fields: payload.into_inner().into(),
        })
        .await?;
    info!(record_id = %record.id(), "record updated");
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(RECORD_UPDATED))
}

/// Delete a record and drop its cache entry.
#[utoipa::path(
    delete,
    path = "/records/{id}",
    params(("id" = i64, Path, description = "Record identifier")),
    responses(
        (status = 200, description = "Record deleted", body = String, content_type = "text/plain"),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 404, description = "Record not found", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Durable store unavailable", body = Error)
    ),
    tags = ["records"],
    operation_id = "deleteRecord"
)]
#[delete("/records/{id}")]
pub async fn delete_record(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = RecordId::new(path.into_inner());
    state.records_command.delete_record(id).await?;
    info!(record_id = %id, "record deleted");
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(RECORD_DELETED))
}

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;
