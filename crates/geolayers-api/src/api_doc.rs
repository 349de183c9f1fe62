//! OpenAPI documentation, served at `/api/openapi.json` and rendered at `/docs`.

use utoipa::OpenApi;

use crate::handlers;
use geolayers_core::models;
use geolayers_infra::ErrorResponse;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Geolayers API",
        version = "0.1.0",
        description = "Upload KML and GeoJSON files into a PostGIS table and read the stored features back as one FeatureCollection or as named layers."
    ),
    paths(
        // Ingestion
        handlers::upload::upload_files,
        // Layers
        handlers::data::get_data,
        handlers::layers::get_layers,
        handlers::sources::list_sources,
    ),
    components(
        schemas(
            models::UploadResponse,
            models::FileReport,
            models::FileStatus,
            models::IngestTotals,
            models::SourceFormat,
            models::SourceSummary,
            // Error
            ErrorResponse,
        )
    ),
    tags(
        (name = "ingest", description = "Upload and ingest geospatial files"),
        (name = "layers", description = "Read stored features as GeoJSON")
    )
)]
pub struct ApiDoc;
