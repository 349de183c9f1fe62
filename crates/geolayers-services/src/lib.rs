//! Geolayers Services Layer
//!
//! Service facade for the API crate: the ingestion pipeline from
//! geolayers-processing and the read-side [`LayerQueryService`]. Keep thin HTTP
//! handling in geolayers-api.

pub mod services;

pub use geolayers_processing::{ConversionError, IngestionPipeline};
pub use services::layers::LayerQueryService;
