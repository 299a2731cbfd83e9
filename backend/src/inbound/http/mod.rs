//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod records;
pub mod state;
pub mod uploads;

use actix_web::web;

use self::error::bad_request;

pub use error::ApiResult;

/// Register the record and upload endpoints with extractor error handlers
/// that answer in the domain error format.
///
/// Handlers expect [`state::HttpState`] as `web::Data`; the caller supplies
/// it.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| bad_request("invalid JSON body", &err)),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| bad_request("invalid record id", &err)),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| bad_request("invalid query string", &err)),
    )
    .service(records::list_records)
    .service(records::update_record)
    .service(records::delete_record)
    .service(uploads::upload_workbook)
    .service(uploads::get_upload_job);
}
