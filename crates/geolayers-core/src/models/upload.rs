use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A single file part received in an upload request.
///
/// The content is held in memory for the duration of the request only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Client-supplied filename. Used for format detection and as the stored layer name.
    pub original_name: String,
    pub content: Vec<u8>,
}

impl UploadedFile {
    pub fn new(original_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            original_name: original_name.into(),
            content: content.into(),
        }
    }

    /// Detected source format, or `None` when the suffix is not supported.
    pub fn format(&self) -> Option<SourceFormat> {
        SourceFormat::from_filename(&self.original_name)
    }
}

/// Geospatial formats accepted for ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Kml,
    GeoJson,
}

impl SourceFormat {
    /// Classify a filename by suffix (case-insensitive).
    ///
    /// `.kml` is KML; `.geojson` and `.json` are GeoJSON; anything else is unsupported.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let lower = filename.to_lowercase();
        if lower.ends_with(".kml") {
            Some(SourceFormat::Kml)
        } else if lower.ends_with(".geojson") || lower.ends_with(".json") {
            Some(SourceFormat::GeoJson)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceFormat::Kml => "kml",
            SourceFormat::GeoJson => "geojson",
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
