use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::SourceFormat;

/// Outcome of ingesting one uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum FileStatus {
    /// Every feature with a geometry was saved.
    Processed,
    /// Filename suffix is not a supported format.
    SkippedUnsupported,
    /// The file parsed but had no feature list, or an empty one.
    SkippedEmpty,
    /// At least one feature could not be saved.
    PartialFailure,
    /// The file could not be parsed, or its transaction was rolled back.
    Failed,
}

/// Per-file entry of an [`IngestReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FileReport {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<SourceFormat>,
    pub status: FileStatus,
    /// Features written to storage.
    pub saved: usize,
    /// Features without a geometry.
    pub skipped: usize,
    /// Features whose geometry was invalid or whose write failed.
    pub failed: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileReport {
    fn empty(name: &str, format: Option<SourceFormat>, status: FileStatus) -> Self {
        Self {
            name: name.to_string(),
            format,
            status,
            saved: 0,
            skipped: 0,
            failed: 0,
            error: None,
        }
    }

    pub fn unsupported(name: &str) -> Self {
        Self::empty(name, None, FileStatus::SkippedUnsupported)
    }

    pub fn no_features(name: &str, format: SourceFormat) -> Self {
        Self::empty(name, Some(format), FileStatus::SkippedEmpty)
    }

    pub fn parse_failed(name: &str, format: SourceFormat, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::empty(name, Some(format), FileStatus::Failed)
        }
    }

    /// Report for a file whose features were attempted.
    pub fn from_counts(
        name: &str,
        format: SourceFormat,
        saved: usize,
        skipped: usize,
        failed: usize,
    ) -> Self {
        let status = if failed > 0 {
            FileStatus::PartialFailure
        } else {
            FileStatus::Processed
        };
        Self {
            saved,
            skipped,
            failed,
            ..Self::empty(name, Some(format), status)
        }
    }

    /// Report for a file ingested all-or-nothing that did not commit:
    /// nothing is saved and every attempted feature counts as failed.
    pub fn rolled_back(
        name: &str,
        format: SourceFormat,
        skipped: usize,
        attempted: usize,
        error: impl Into<String>,
    ) -> Self {
        Self {
            skipped,
            failed: attempted,
            error: Some(error.into()),
            ..Self::empty(name, Some(format), FileStatus::Failed)
        }
    }
}

/// Aggregated counts across all files of a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IngestTotals {
    pub files: usize,
    pub saved: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Result of one ingestion run, one entry per uploaded file in upload order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IngestReport {
    pub files: Vec<FileReport>,
    pub totals: IngestTotals,
}

impl IngestReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, file: FileReport) {
        self.totals.files += 1;
        self.totals.saved += file.saved;
        self.totals.skipped += file.skipped;
        self.totals.failed += file.failed;
        self.files.push(file);
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// True when no file failed and no feature write failed.
    pub fn is_clean(&self) -> bool {
        self.totals.failed == 0
            && self
                .files
                .iter()
                .all(|f| f.status != FileStatus::Failed && f.status != FileStatus::PartialFailure)
    }

    /// One-line human readable summary.
    pub fn summary(&self) -> String {
        if self.is_clean() {
            format!(
                "Files processed and saved! {} file(s), {} feature(s) saved, {} skipped",
                self.totals.files, self.totals.saved, self.totals.skipped
            )
        } else {
            format!(
                "Files processed with errors: {} file(s), {} feature(s) saved, {} skipped, {} failed",
                self.totals.files, self.totals.saved, self.totals.skipped, self.totals.failed
            )
        }
    }
}

/// Body of a successful `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    pub files: Vec<FileReport>,
    pub totals: IngestTotals,
}

impl From<IngestReport> for UploadResponse {
    fn from(report: IngestReport) -> Self {
        Self {
            message: report.summary(),
            files: report.files,
            totals: report.totals,
        }
    }
}
