use crate::error::HttpAppError;
use crate::state::QueryState;
use axum::extract::State;
use axum::Json;
use geojson::FeatureCollection;
use geolayers_infra::ErrorResponse;
use std::collections::BTreeMap;

#[utoipa::path(
    get,
    path = "/layers",
    tag = "layers",
    responses(
        (status = 200, description = "One FeatureCollection per source file name", body = Object),
        (status = 500, description = "Storage read failed", body = ErrorResponse)
    )
)]
pub async fn get_layers(
    State(query): State<QueryState>,
) -> Result<Json<BTreeMap<String, FeatureCollection>>, HttpAppError> {
    let layers = query.layers.layers().await?;
    Ok(Json(layers))
}
