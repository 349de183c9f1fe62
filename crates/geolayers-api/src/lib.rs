//! Geolayers API Library
//!
//! HTTP handlers, application state and setup for the geolayers service.

mod api_doc;
mod handlers;
mod utils;

pub mod error;
pub mod setup;
pub mod state;

pub use api_doc::get_openapi_spec;
pub use error::HttpAppError;
pub use geolayers_infra::ErrorResponse;
