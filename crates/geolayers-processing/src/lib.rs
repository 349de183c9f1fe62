//! Geolayers processing
//!
//! Turns uploaded KML and GeoJSON files into normalized geometries and writes
//! them to storage through the [`IngestionPipeline`].

pub mod error;
pub mod extract;
pub mod geojson_source;
pub mod kml_source;
pub mod normalize;
pub mod pipeline;

pub use error::ConversionError;
pub use extract::{extract_features, ExtractedFeatures, FeatureGeometry};
pub use normalize::force_2d;
pub use pipeline::IngestionPipeline;
