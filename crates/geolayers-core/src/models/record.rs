use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One persisted feature: a row of `geo_data`.
///
/// Records are never updated in place; the geometry is 2D and in SRID 4326.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: i64,
    /// Original name of the file the feature was extracted from.
    pub name: String,
    pub geometry: geojson::Geometry,
}

/// Feature count per ingested source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SourceSummary {
    pub name: String,
    pub feature_count: i64,
}
