//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every HTTP path from the inbound layer together with
//! the record, error, and job schemas. Swagger UI serves it under `/docs` in
//! debug builds.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode, Record, RecordFields, RecordId};
use crate::inbound::http::records::RecordBody;
use crate::inbound::http::uploads::{SkippedRowResponse, UploadJobResponse};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Records API",
        description = "Spreadsheet ingestion and record management backed by PostgreSQL with a Redis mirror."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::uploads::upload_workbook,
        crate::inbound::http::uploads::get_upload_job,
        crate::inbound::http::records::list_records,
        crate::inbound::http::records::update_record,
        crate::inbound::http::records::delete_record,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Record,
        RecordFields,
        RecordId,
        RecordBody,
        Error,
        ErrorCode,
        UploadJobResponse,
        SkippedRowResponse
    )),
    tags(
        (name = "uploads", description = "Workbook ingestion"),
        (name = "records", description = "Stored records"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
