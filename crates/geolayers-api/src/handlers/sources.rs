use crate::error::HttpAppError;
use crate::state::QueryState;
use axum::extract::State;
use axum::Json;
use geolayers_core::models::SourceSummary;
use geolayers_infra::ErrorResponse;

#[utoipa::path(
    get,
    path = "/sources",
    tag = "layers",
    responses(
        (status = 200, description = "Ingested source files with their feature counts", body = Vec<SourceSummary>),
        (status = 500, description = "Storage read failed", body = ErrorResponse)
    )
)]
pub async fn list_sources(
    State(query): State<QueryState>,
) -> Result<Json<Vec<SourceSummary>>, HttpAppError> {
    let sources = query.layers.sources().await?;
    Ok(Json(sources))
}
