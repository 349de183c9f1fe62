//! Ingestion pipeline
//!
//! Classifies each uploaded file, extracts its features, flattens geometries to
//! 2D and writes them to the [`GeoFeatureStore`]. Every file ends up with exactly
//! one [`FileReport`]; no per-file or per-feature failure aborts the run.

use std::sync::Arc;

use geolayers_core::models::{FileReport, IngestReport, SourceFormat, UploadedFile};
use geolayers_core::{ErrorMetadata, IngestConfig};
use geolayers_db::GeoFeatureStore;

use crate::extract::{extract_features, ExtractedFeatures, FeatureGeometry};
use crate::normalize::{force_2d, is_empty_geometry};

/// Features of one file, split by what happens to them.
struct PreparedFeatures {
    geometries: Vec<geojson::Geometry>,
    skipped: usize,
    invalid: usize,
}

impl PreparedFeatures {
    fn from_extracted(name: &str, features: Vec<FeatureGeometry>) -> Self {
        let mut prepared = Self {
            geometries: Vec::with_capacity(features.len()),
            skipped: 0,
            invalid: 0,
        };
        for (index, feature) in features.into_iter().enumerate() {
            match feature {
                FeatureGeometry::Present(geometry) if is_empty_geometry(&geometry) => {
                    tracing::debug!(file = %name, feature = index, "Skipping empty geometry");
                    prepared.skipped += 1;
                }
                FeatureGeometry::Present(geometry) => match force_2d(&geometry) {
                    Ok(flat) => prepared.geometries.push(flat),
                    Err(e) => {
                        tracing::warn!(file = %name, feature = index, error = %e, "Dropping feature");
                        prepared.invalid += 1;
                    }
                },
                FeatureGeometry::Missing => prepared.skipped += 1,
                FeatureGeometry::Invalid(reason) => {
                    tracing::warn!(file = %name, feature = index, error = %reason, "Dropping feature");
                    prepared.invalid += 1;
                }
            }
        }
        prepared
    }

    fn attempted(&self) -> usize {
        self.geometries.len() + self.invalid
    }
}

#[derive(Clone)]
pub struct IngestionPipeline {
    store: Arc<dyn GeoFeatureStore>,
    config: IngestConfig,
}

impl IngestionPipeline {
    pub fn new(store: Arc<dyn GeoFeatureStore>, config: IngestConfig) -> Self {
        Self { store, config }
    }

    /// Ingest files in upload order and report on each one.
    pub async fn ingest(&self, files: Vec<UploadedFile>) -> IngestReport {
        let mut report = IngestReport::new();
        for file in &files {
            report.push(self.ingest_file(file).await);
        }

        tracing::info!(
            files = report.totals.files,
            saved = report.totals.saved,
            skipped = report.totals.skipped,
            failed = report.totals.failed,
            "Ingestion finished"
        );
        report
    }

    #[tracing::instrument(skip(self, file), fields(file = %file.original_name, size = file.content.len()))]
    pub async fn ingest_file(&self, file: &UploadedFile) -> FileReport {
        let name = file.original_name.as_str();

        let Some(format) = file.format() else {
            tracing::info!("Skipping file with unsupported extension");
            return FileReport::unsupported(name);
        };

        let features = match extract_features(format, &file.content) {
            Ok(ExtractedFeatures::Features(features)) if !features.is_empty() => features,
            Ok(_) => {
                tracing::info!(format = %format, "File contains no features");
                return FileReport::no_features(name, format);
            }
            Err(e) => {
                tracing::warn!(format = %format, error = %e, "Failed to parse file");
                return FileReport::parse_failed(name, format, e.to_string());
            }
        };

        let prepared = PreparedFeatures::from_extracted(name, features);

        if self.config.atomic_file_ingest {
            self.write_atomic(name, format, prepared).await
        } else {
            self.write_each(name, format, prepared).await
        }
    }

    async fn write_each(
        &self,
        name: &str,
        format: SourceFormat,
        prepared: PreparedFeatures,
    ) -> FileReport {
        let mut saved = 0;
        let mut failed = prepared.invalid;

        for geometry in &prepared.geometries {
            match self.store.insert_feature(name, geometry).await {
                Ok(()) => saved += 1,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to save feature");
                    failed += 1;
                }
            }
        }

        tracing::info!(format = %format, saved, skipped = prepared.skipped, failed, "File ingested");
        FileReport::from_counts(name, format, saved, prepared.skipped, failed)
    }

    async fn write_atomic(
        &self,
        name: &str,
        format: SourceFormat,
        prepared: PreparedFeatures,
    ) -> FileReport {
        let attempted = prepared.attempted();

        if prepared.invalid > 0 {
            tracing::warn!(invalid = prepared.invalid, "File rejected, it contains invalid geometries");
            return FileReport::rolled_back(
                name,
                format,
                prepared.skipped,
                attempted,
                format!("{} feature(s) have invalid geometry", prepared.invalid),
            );
        }

        if prepared.geometries.is_empty() {
            return FileReport::from_counts(name, format, 0, prepared.skipped, 0);
        }

        match self
            .store
            .insert_features_atomic(name, &prepared.geometries)
            .await
        {
            Ok(saved) => {
                tracing::info!(format = %format, saved, skipped = prepared.skipped, "File ingested");
                FileReport::from_counts(name, format, saved, prepared.skipped, 0)
            }
            Err(e) => {
                tracing::warn!(error = %e, "File transaction rolled back");
                FileReport::rolled_back(name, format, prepared.skipped, attempted, e.client_message())
            }
        }
    }
}
