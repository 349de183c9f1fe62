//! Multipart upload extraction

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use geolayers_core::models::UploadedFile;
use geolayers_core::AppError;

/// Form field names carrying uploaded files.
pub const FILE_FIELDS: [&str; 2] = ["files", "files[]"];

const UNKNOWN_FILENAME: &str = "unknown";

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Upload exceeds the maximum request size".to_string())
    } else {
        AppError::BadRequest(format!("Failed to read multipart: {}", err.body_text()))
    }
}

/// Collect every file part of the form, in order. Other fields are ignored.
pub async fn extract_uploaded_files(mut multipart: Multipart) -> Result<Vec<UploadedFile>, AppError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();
        if !FILE_FIELDS.contains(&field_name.as_str()) {
            tracing::debug!(field = %field_name, "Ignoring multipart field");
            continue;
        }

        let filename = field
            .file_name()
            .map(|s: &str| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| UNKNOWN_FILENAME.to_string());

        let data = field.bytes().await.map_err(multipart_error)?;
        tracing::debug!(file = %filename, size = data.len(), "Received file");

        files.push(UploadedFile::new(filename, data.to_vec()));
    }

    Ok(files)
}
