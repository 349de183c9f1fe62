use geolayers_core::models::SourceFormat;

use crate::error::ConversionError;
use crate::{geojson_source, kml_source};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Geometry slot of one extracted feature.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureGeometry {
    Present(geojson::Geometry),
    /// Feature has a null or missing geometry.
    Missing,
    /// Feature has a geometry that cannot be represented as GeoJSON geometry.
    Invalid(String),
}

/// Features found in one source document.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedFeatures {
    /// The document parsed but has no feature list at all.
    NoFeatureList,
    Features(Vec<FeatureGeometry>),
}

impl ExtractedFeatures {
    /// True when there is nothing to ingest (no list, or an empty one).
    pub fn is_empty(&self) -> bool {
        match self {
            ExtractedFeatures::NoFeatureList => true,
            ExtractedFeatures::Features(features) => features.is_empty(),
        }
    }
}

/// Decode upload bytes as UTF-8 (lossy), ignoring a leading byte order mark.
pub fn decode_text(content: &[u8]) -> String {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);
    String::from_utf8_lossy(content).into_owned()
}

/// Parse `content` in the given format into a list of feature geometries.
pub fn extract_features(
    format: SourceFormat,
    content: &[u8],
) -> Result<ExtractedFeatures, ConversionError> {
    let text = decode_text(content);
    match format {
        SourceFormat::GeoJson => geojson_source::extract(&text),
        SourceFormat::Kml => kml_source::extract(&text),
    }
}
