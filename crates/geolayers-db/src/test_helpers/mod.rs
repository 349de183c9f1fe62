//! In-memory storage for testing
//!
//! Lets the pipeline, query service and HTTP layer be tested without a database.

use async_trait::async_trait;
use geolayers_core::models::{SourceSummary, StoredRecord};
use geolayers_core::AppError;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::GeoFeatureStore;

type RejectFn = dyn Fn(&geojson::Geometry) -> bool + Send + Sync;

#[derive(Default)]
struct Inner {
    records: Vec<StoredRecord>,
    next_id: i64,
}

/// Mock store keeping records in a `Vec`, in insertion order.
#[derive(Clone, Default)]
pub struct InMemoryGeoStore {
    inner: Arc<Mutex<Inner>>,
    reject: Option<Arc<RejectFn>>,
    unavailable: bool,
}

impl InMemoryGeoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes of geometries matching `predicate` fail as the database would.
    pub fn rejecting<F>(predicate: F) -> Self
    where
        F: Fn(&geojson::Geometry) -> bool + Send + Sync + 'static,
    {
        Self {
            reject: Some(Arc::new(predicate)),
            ..Self::default()
        }
    }

    /// Every operation fails, simulating a lost connection.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn records(&self) -> Vec<StoredRecord> {
        self.lock().records.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // a poisoned lock only means another test thread panicked
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.unavailable {
            return Err(AppError::Database(sqlx::Error::PoolClosed));
        }
        Ok(())
    }

    fn check_geometry(&self, geometry: &geojson::Geometry) -> Result<(), AppError> {
        if self.reject.as_ref().is_some_and(|reject| reject(geometry)) {
            return Err(AppError::Database(sqlx::Error::Protocol(
                "invalid geometry".to_string(),
            )));
        }
        Ok(())
    }

    fn push(inner: &mut Inner, name: &str, geometry: &geojson::Geometry) {
        inner.next_id += 1;
        let id = inner.next_id;
        inner.records.push(StoredRecord {
            id,
            name: name.to_string(),
            geometry: geometry.clone(),
        });
    }
}

#[async_trait]
impl GeoFeatureStore for InMemoryGeoStore {
    async fn insert_feature(&self, name: &str, geometry: &geojson::Geometry) -> Result<(), AppError> {
        self.check_available()?;
        self.check_geometry(geometry)?;
        Self::push(&mut self.lock(), name, geometry);
        Ok(())
    }

    async fn insert_features_atomic(
        &self,
        name: &str,
        geometries: &[geojson::Geometry],
    ) -> Result<usize, AppError> {
        self.check_available()?;
        for geometry in geometries {
            self.check_geometry(geometry)?;
        }
        let mut inner = self.lock();
        for geometry in geometries {
            Self::push(&mut inner, name, geometry);
        }
        Ok(geometries.len())
    }

    async fn list_records(&self) -> Result<Vec<StoredRecord>, AppError> {
        self.check_available()?;
        Ok(self.records())
    }

    async fn list_sources(&self) -> Result<Vec<SourceSummary>, AppError> {
        self.check_available()?;
        let mut counts: BTreeMap<String, i64> = BTreeMap::new();
        for record in &self.lock().records {
            *counts.entry(record.name.clone()).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(name, feature_count)| SourceSummary {
                name,
                feature_count,
            })
            .collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.check_available()
    }
}
