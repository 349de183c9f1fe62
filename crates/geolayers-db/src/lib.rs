//! Geolayers storage layer
//!
//! The [`GeoFeatureStore`] trait is the storage contract shared by the ingestion
//! pipeline and the layer query service. [`GeoDataRepository`] implements it on
//! PostGIS; the `test-helpers` feature adds an in-memory implementation.

pub mod db;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use db::*;
