//! GeoJSON documents
//!
//! Any syntactically valid JSON is accepted. The feature list is the top-level
//! `features` array; anything without one has no features. A feature whose
//! geometry is null, absent or has no coordinates has no geometry.

use serde_json::Value;

use crate::error::ConversionError;
use crate::extract::{ExtractedFeatures, FeatureGeometry};
use crate::normalize::is_empty_geometry;

pub fn extract(text: &str) -> Result<ExtractedFeatures, ConversionError> {
    let document: Value = serde_json::from_str(text)?;

    let Some(features) = document.get("features").and_then(Value::as_array) else {
        return Ok(ExtractedFeatures::NoFeatureList);
    };

    Ok(ExtractedFeatures::Features(
        features.iter().map(feature_geometry).collect(),
    ))
}

fn has_empty_coordinates(geometry: &Value) -> bool {
    matches!(geometry.get("coordinates"), Some(Value::Array(coordinates)) if coordinates.is_empty())
}

fn feature_geometry(feature: &Value) -> FeatureGeometry {
    match feature.get("geometry") {
        None | Some(Value::Null) => FeatureGeometry::Missing,
        // `geojson` rejects a Point with `[]`, so empty coordinates are caught first
        Some(geometry) if has_empty_coordinates(geometry) => FeatureGeometry::Missing,
        Some(geometry) => match serde_json::from_value::<geojson::Geometry>(geometry.clone()) {
            Ok(geometry) if is_empty_geometry(&geometry) => FeatureGeometry::Missing,
            Ok(geometry) => FeatureGeometry::Present(geometry),
            Err(e) => FeatureGeometry::Invalid(e.to_string()),
        },
    }
}
