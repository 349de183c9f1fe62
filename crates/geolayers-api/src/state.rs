//! Application state and sub-state extractors.
//!
//! Handlers extract only the part they need via Axum's `FromRef`. The storage
//! pool is created once at startup and shared by both services through the
//! `GeoFeatureStore` trait object.

use geolayers_core::Config;
use geolayers_db::GeoFeatureStore;
use geolayers_services::{IngestionPipeline, LayerQueryService};
use std::sync::Arc;

/// Write side: the ingestion pipeline.
#[derive(Clone)]
pub struct IngestState {
    pub pipeline: IngestionPipeline,
}

/// Read side: GeoJSON views over stored features.
#[derive(Clone)]
pub struct QueryState {
    pub layers: LayerQueryService,
}

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn GeoFeatureStore>,
    pub ingest: IngestState,
    pub query: QueryState,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn GeoFeatureStore>) -> Self {
        let ingest = IngestState {
            pipeline: IngestionPipeline::new(store.clone(), config.ingest()),
        };
        let query = QueryState {
            layers: LayerQueryService::new(store.clone()),
        };
        Self {
            config,
            store,
            ingest,
            query,
        }
    }
}

// ----- FromRef for sub-state extraction -----

impl axum::extract::FromRef<Arc<AppState>> for IngestState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.ingest.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for QueryState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.query.clone()
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
