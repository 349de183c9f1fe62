//! Data models for the application
//!
//! Uploads and their formats, the records persisted in `geo_data`, and the
//! per-file ingestion report returned to clients.

mod record;
mod report;
mod upload;

pub use record::*;
pub use report::*;
pub use upload::*;
