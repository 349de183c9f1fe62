//! Database repositories for data access layer
//
// Storage contract shared by ingestion and queries
pub mod store;
//
// PostGIS implementation of the contract (geo_data table)
pub mod geo_data;
//
// Transaction utilities
pub mod transaction;

pub use geo_data::GeoDataRepository;
pub use store::GeoFeatureStore;
pub use transaction::TransactionGuard;
