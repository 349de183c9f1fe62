use async_trait::async_trait;
use geolayers_core::models::{SourceSummary, StoredRecord};
use geolayers_core::AppError;
use sqlx::{PgPool, Postgres};

use super::store::GeoFeatureStore;
use super::transaction::TransactionGuard;

const INSERT_FEATURE: &str = r#"
    INSERT INTO geo_data (name, geometry)
    VALUES ($1, ST_SetSRID(ST_Force2D(ST_GeomFromGeoJSON($2)), 4326))
    "#;

#[derive(sqlx::FromRow)]
struct GeoDataRow {
    id: i64,
    name: String,
    geometry: String,
}

impl TryFrom<GeoDataRow> for StoredRecord {
    type Error = AppError;

    fn try_from(row: GeoDataRow) -> Result<Self, Self::Error> {
        let geometry = serde_json::from_str::<geojson::Geometry>(&row.geometry).map_err(|e| {
            AppError::Internal(format!(
                "Stored geometry for record {} is not valid GeoJSON: {}",
                row.id, e
            ))
        })?;
        Ok(StoredRecord {
            id: row.id,
            name: row.name,
            geometry,
        })
    }
}

/// Repository for the `geo_data` table (PostGIS)
#[derive(Clone)]
pub struct GeoDataRepository {
    pool: PgPool,
}

impl GeoDataRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn encode_geometry(geometry: &geojson::Geometry) -> Result<String, AppError> {
    serde_json::to_string(geometry)
        .map_err(|e| AppError::Internal(format!("Failed to encode geometry: {}", e)))
}

#[async_trait]
impl GeoFeatureStore for GeoDataRepository {
    #[tracing::instrument(skip(self, geometry), fields(db.table = "geo_data", db.operation = "insert"))]
    async fn insert_feature(&self, name: &str, geometry: &geojson::Geometry) -> Result<(), AppError> {
        let geometry = encode_geometry(geometry)?;
        sqlx::query(INSERT_FEATURE)
            .bind(name)
            .bind(&geometry)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[tracing::instrument(
        skip(self, geometries),
        fields(db.table = "geo_data", db.operation = "insert", count = geometries.len())
    )]
    async fn insert_features_atomic(
        &self,
        name: &str,
        geometries: &[geojson::Geometry],
    ) -> Result<usize, AppError> {
        let encoded = geometries
            .iter()
            .map(encode_geometry)
            .collect::<Result<Vec<_>, _>>()?;

        let mut tx = TransactionGuard::begin(&self.pool).await?;
        for geometry in &encoded {
            let result = sqlx::query(INSERT_FEATURE)
                .bind(name)
                .bind(geometry)
                .execute(tx.connection()?)
                .await;
            if let Err(e) = result {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(error = %rollback_err, "Rollback failed after insert error");
                }
                return Err(e.into());
            }
        }
        tx.commit().await?;

        Ok(encoded.len())
    }

    #[tracing::instrument(skip(self), fields(db.table = "geo_data", db.operation = "select"))]
    async fn list_records(&self) -> Result<Vec<StoredRecord>, AppError> {
        let rows = sqlx::query_as::<Postgres, GeoDataRow>(
            "SELECT id, name, ST_AsGeoJSON(geometry) AS geometry FROM geo_data ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(StoredRecord::try_from).collect()
    }

    #[tracing::instrument(skip(self), fields(db.table = "geo_data", db.operation = "select"))]
    async fn list_sources(&self) -> Result<Vec<SourceSummary>, AppError> {
        let sources = sqlx::query_as::<Postgres, SourceSummary>(
            r#"
            SELECT name, COUNT(*) AS feature_count
            FROM geo_data
            GROUP BY name
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sources)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_conversion() {
        let row = GeoDataRow {
            id: 7,
            name: "a.geojson".to_string(),
            geometry: r#"{"type":"Point","coordinates":[10.5,59.9]}"#.to_string(),
        };
        let record = StoredRecord::try_from(row).expect("valid row");
        assert_eq!(record.id, 7);
        assert_eq!(record.name, "a.geojson");
        assert_eq!(
            record.geometry.value,
            geojson::Value::Point(vec![10.5, 59.9])
        );
    }

    #[test]
    fn test_row_conversion_rejects_garbage() {
        let row = GeoDataRow {
            id: 1,
            name: "x".to_string(),
            geometry: "not json".to_string(),
        };
        let err = StoredRecord::try_from(row).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
