//! Workbook upload HTTP handlers.
//!
//! ```text
//! POST /upload              multipart/form-data, field `file`
//! GET  /uploads/{job_id}
//! ```
//!
//! The upload handler answers once the header has been validated and the
//! rows are queued. Clients follow the `Location` header to poll the job.

use actix_multipart::{Field, Multipart};
use actix_web::http::header;
use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::domain::ingestion::{RowRejection, SkippedRow};
use crate::domain::{Error, IngestionJob, IngestionJobId, IngestionJobStatus};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Multipart field carrying the workbook.
pub const UPLOAD_FIELD: &str = "file";
/// Response header carrying the ingestion job identifier.
pub const UPLOAD_JOB_ID_HEADER: &str = "Upload-Job-Id";
/// Confirmation body for an accepted upload.
pub const UPLOAD_ACCEPTED: &str = "File uploaded and processing initiated";

fn invalid_file(reason: impl std::fmt::Display) -> Error {
    warn!(%reason, "upload rejected");
    Error::invalid_request("Invalid file").with_details(json!({
        "field": UPLOAD_FIELD,
        "reason": reason.to_string(),
    }))
}

async fn drain(field: &mut Field) -> Result<(), Error> {
    while field.try_next().await.map_err(invalid_file)?.is_some() {}
    Ok(())
}

async fn read_capped(field: &mut Field, limit: usize) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(invalid_file)? {
        if bytes.len() + chunk.len() > limit {
            return Err(invalid_file(format!(
                "file exceeds the upload limit of {limit} bytes"
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Pull the `file` field out of the form, ignoring any other fields.
async fn read_workbook_field(mut payload: Multipart, limit: usize) -> Result<Vec<u8>, Error> {
    while let Some(mut field) = payload.try_next().await.map_err(invalid_file)? {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = read_capped(&mut field, limit).await?;
            if bytes.is_empty() {
                return Err(invalid_file("file is empty"));
            }
            return Ok(bytes);
        }
        drain(&mut field).await?;
    }
    Err(invalid_file(format!("missing `{UPLOAD_FIELD}` field")))
}

/// Accept a workbook, validate its header, and queue its rows.
#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = String, content_type = "multipart/form-data",
        description = "Form with a `file` field holding an .xlsx workbook"),
    responses(
        (
            status = 200,
            description = "Header valid; rows queued for ingestion",
            headers(
                ("Upload-Job-Id" = String, description = "Ingestion job identifier"),
                ("Location" = String, description = "Job status URL")
            ),
            body = String,
            content_type = "text/plain"
        ),
        (
            status = 400,
            description = "Missing, oversized, unreadable, or mismatched workbook",
            body = Error
        ),
        (status = 500, description = "Rows could not be read", body = Error),
        (status = 503, description = "Ingestion queue is full", body = Error)
    ),
    tags = ["uploads"],
    operation_id = "uploadWorkbook"
)]
#[post("/upload")]
pub async fn upload_workbook(
    state: web::Data<HttpState>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let workbook = read_workbook_field(payload, state.max_upload_bytes).await?;
    let accepted = state.uploads.submit_upload(workbook).await?;
    info!(
        job_id = %accepted.job_id,
        row_count = accepted.row_count,
        "upload accepted"
    );
    Ok(HttpResponse::Ok()
        .insert_header((UPLOAD_JOB_ID_HEADER, accepted.job_id.to_string()))
        .insert_header((header::LOCATION, format!("/uploads/{}", accepted.job_id)))
        .content_type("text/plain; charset=utf-8")
        .body(UPLOAD_ACCEPTED))
}

/// A row left out of an ingestion batch.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRowResponse {
    /// One-based sheet row, counting the header as row 1.
    pub row: usize,
    /// `out_of_range` or `blank`.
    pub reason: String,
    /// Number of fields present, for `out_of_range`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<usize>,
}

impl From<&SkippedRow> for SkippedRowResponse {
    fn from(value: &SkippedRow) -> Self {
        let (reason, fields) = match value.rejection {
            RowRejection::OutOfRange { fields } => ("out_of_range", Some(fields)),
            RowRejection::Blank => ("blank", None),
        };
        Self {
            row: value.row,
            reason: reason.to_owned(),
            fields,
        }
    }
}

/// Status of an ingestion job.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadJobResponse {
    pub job_id: String,
    /// `queued`, `running`, `completed`, or `failed`.
    pub status: String,
    pub row_count: usize,
    pub stored: usize,
    pub skipped: usize,
    pub skipped_rows: Vec<SkippedRowResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

fn status_label(status: IngestionJobStatus) -> &'static str {
    match status {
        IngestionJobStatus::Queued => "queued",
        IngestionJobStatus::Running => "running",
        IngestionJobStatus::Completed => "completed",
        IngestionJobStatus::Failed => "failed",
    }
}

impl From<IngestionJob> for UploadJobResponse {
    fn from(job: IngestionJob) -> Self {
        Self {
            job_id: job.id.to_string(),
            status: status_label(job.status).to_owned(),
            row_count: job.row_count,
            stored: job.stored,
            skipped: job.skipped,
            skipped_rows: job.skipped_rows.iter().map(SkippedRowResponse::from).collect(),
            failure: job.failure,
            submitted_at: job.submitted_at,
            started_at: job.started_at,
            finished_at: job.finished_at,
        }
    }
}

/// Report the progress of an ingestion job.
#[utoipa::path(
    get,
    path = "/uploads/{job_id}",
    params(("job_id" = String, Path, description = "Identifier from the Upload-Job-Id header")),
    responses(
        (status = 200, description = "Job status", body = UploadJobResponse),
        (status = 400, description = "Malformed job identifier", body = Error),
        (status = 404, description = "Unknown or expired job", body = Error)
    ),
    tags = ["uploads"],
    operation_id = "getUploadJob"
)]
#[get("/uploads/{job_id}")]
pub async fn get_upload_job(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UploadJobResponse>> {
    let raw = path.into_inner();
    let job_id: IngestionJobId = raw.parse().map_err(|_| {
        Error::invalid_request("invalid job id").with_details(json!({ "value": raw }))
    })?;
    let job = state.upload_jobs.job_status(job_id).await?;
    Ok(web::Json(UploadJobResponse::from(job)))
}

#[cfg(test)]
#[path = "uploads_tests.rs"]
mod tests;
