use crate::error::HttpAppError;
use crate::state::IngestState;
use crate::utils::upload::extract_uploaded_files;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use geolayers_core::models::UploadResponse;
use geolayers_core::AppError;
use geolayers_infra::ErrorResponse;

#[utoipa::path(
    post,
    path = "/upload",
    tag = "ingest",
    request_body(
        content = inline(Object),
        content_type = "multipart/form-data",
        description = "One or more KML (.kml) or GeoJSON (.geojson, .json) files in fields `files` or `files[]`"
    ),
    responses(
        (status = 200, description = "Files processed; per-file outcome in the report", body = UploadResponse),
        (status = 400, description = "No files uploaded or malformed multipart body", body = ErrorResponse),
        (status = 413, description = "Request body too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn upload_files(
    State(ingest): State<IngestState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let files = extract_uploaded_files(multipart?).await?;

    if files.is_empty() {
        return Err(AppError::InvalidInput("No files uploaded".to_string()).into());
    }

    tracing::info!(files = files.len(), "Upload received");
    let report = ingest.pipeline.ingest(files).await;

    Ok(Json(UploadResponse::from(report)))
}
