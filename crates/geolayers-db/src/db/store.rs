use async_trait::async_trait;
use geolayers_core::models::{SourceSummary, StoredRecord};
use geolayers_core::AppError;

/// Storage contract for `geo_data`.
///
/// Every write normalizes the geometry to 2D and SRID 4326. Reads return records
/// in insertion order.
#[async_trait]
pub trait GeoFeatureStore: Send + Sync {
    /// Insert one feature as its own unit of work.
    async fn insert_feature(&self, name: &str, geometry: &geojson::Geometry) -> Result<(), AppError>;

    /// Insert all geometries of one source in a single transaction.
    ///
    /// Either every geometry is stored and the count is returned, or nothing is stored.
    async fn insert_features_atomic(
        &self,
        name: &str,
        geometries: &[geojson::Geometry],
    ) -> Result<usize, AppError>;

    /// Read every stored record.
    async fn list_records(&self) -> Result<Vec<StoredRecord>, AppError>;

    /// Distinct source names with their feature counts, sorted by name.
    async fn list_sources(&self) -> Result<Vec<SourceSummary>, AppError>;

    /// Cheap connectivity check used by readiness probes.
    async fn ping(&self) -> Result<(), AppError>;
}
