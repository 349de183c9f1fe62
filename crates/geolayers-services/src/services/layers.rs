//! Read side of the stored features
//!
//! Builds GeoJSON views over `geo_data`: one collection of everything, and one
//! collection per source file.

use std::collections::BTreeMap;
use std::sync::Arc;

use geojson::{Feature, FeatureCollection, JsonObject};
use geolayers_core::models::{SourceSummary, StoredRecord};
use geolayers_core::AppError;
use geolayers_db::GeoFeatureStore;

#[derive(Clone)]
pub struct LayerQueryService {
    store: Arc<dyn GeoFeatureStore>,
}

fn feature(record: StoredRecord, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(record.geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

impl LayerQueryService {
    pub fn new(store: Arc<dyn GeoFeatureStore>) -> Self {
        Self { store }
    }

    /// Every stored feature, tagged with its source name in `properties.name`.
    #[tracing::instrument(skip(self))]
    pub async fn all_features(&self) -> Result<FeatureCollection, AppError> {
        let records = self.store.list_records().await?;
        tracing::debug!(count = records.len(), "Loaded features");

        let features = records
            .into_iter()
            .map(|record| {
                let mut properties = JsonObject::new();
                properties.insert(
                    "name".to_string(),
                    serde_json::Value::String(record.name.clone()),
                );
                feature(record, properties)
            })
            .collect();

        Ok(collection(features))
    }

    /// Features grouped by source name, one collection per name.
    ///
    /// Layer features carry empty properties; the name is the map key.
    #[tracing::instrument(skip(self))]
    pub async fn layers(&self) -> Result<BTreeMap<String, FeatureCollection>, AppError> {
        let records = self.store.list_records().await?;

        let mut layers: BTreeMap<String, FeatureCollection> = BTreeMap::new();
        for mut record in records {
            let name = std::mem::take(&mut record.name);
            layers
                .entry(name)
                .or_insert_with(|| collection(Vec::new()))
                .features
                .push(feature(record, JsonObject::new()));
        }

        tracing::debug!(layers = layers.len(), "Grouped features into layers");
        Ok(layers)
    }

    pub async fn sources(&self) -> Result<Vec<SourceSummary>, AppError> {
        self.store.list_sources().await
    }
}
