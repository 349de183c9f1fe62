//! Geolayers Core Library
//!
//! This crate provides core domain models, error types and configuration
//! that are shared across all Geolayers components.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{BaseConfig, Config, IngestConfig, ServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
