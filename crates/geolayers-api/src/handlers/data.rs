use crate::error::HttpAppError;
use crate::state::QueryState;
use axum::extract::State;
use axum::Json;
use geojson::FeatureCollection;
use geolayers_infra::ErrorResponse;

#[utoipa::path(
    get,
    path = "/data",
    tag = "layers",
    responses(
        (status = 200, description = "All stored features as one FeatureCollection; `properties.name` is the source file", body = Object),
        (status = 500, description = "Storage read failed", body = ErrorResponse)
    )
)]
pub async fn get_data(
    State(query): State<QueryState>,
) -> Result<Json<FeatureCollection>, HttpAppError> {
    let collection = query.layers.all_features().await?;
    Ok(Json(collection))
}
