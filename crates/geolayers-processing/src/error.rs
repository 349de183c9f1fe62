/// Failure converting one uploaded file or one feature.
///
/// These never abort a request; the pipeline records them in the file's report entry.
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed XML: {0}")]
    Xml(String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),
}
