//! Build orchestration.
//!
//! `ExportService` runs one build as a single logical task: enumeration,
//! naming and assembly are uninterrupted synchronous steps; compression
//! and the delivery handoff run on the blocking pool and are the only
//! suspension points. All fatal errors are caught once here, logged,
//! surfaced as one failure notification, and leave the tracker in a
//! clean, retryable `Error` state. A build either yields one complete
//! archive handed to delivery, or yields nothing.

use crate::delivery::{DeliveryError, SaveTarget};
use crate::metrics::Metrics;
use crate::models::{ExportConfiguration, ProjectCollections};
use crate::notify::NotificationSink;
use crate::services::assemble::{self, AssembleError};
use crate::services::enumerate;
use crate::services::package::{self, PackageError, PackageOutput};
use crate::state::ProgressTracker;
use camino::Utf8PathBuf;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Errors that can end a build.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("an export is already running")]
    BuildInProgress,

    #[error("nothing to export with the current settings")]
    NothingToExport,

    #[error("failed to assemble archive tree: {0}")]
    Assemble(#[from] AssembleError),

    #[error("failed to compress archive: {0}")]
    Package(#[from] PackageError),

    #[error("failed to deliver archive: {0}")]
    Delivery(#[from] DeliveryError),

    #[error("export task failed: {0}")]
    Task(String),
}

/// Summary of a successful build.
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub archive_path: Utf8PathBuf,
    pub total_items: usize,
    pub files_written: usize,
    pub files_skipped: usize,
}

/// Service running export builds.
///
/// Stateless apart from its metrics handle; all build inputs arrive as
/// explicit parameters, so the service works the same under the
/// interactive export view and a batch caller.
pub struct ExportService {
    metrics: Arc<Metrics>,
}

impl ExportService {
    pub fn new() -> Self {
        Self {
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Metrics recorded across this service's builds.
    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// Run one export build to completion or failure.
    ///
    /// The configuration is taken by value as the frozen snapshot for
    /// this build. Exactly one build may be active per tracker; a second
    /// call while one runs returns [`ExportError::BuildInProgress`]
    /// without touching the running build.
    ///
    /// A pre-flight with nothing to export returns
    /// [`ExportError::NothingToExport`] and leaves the tracker reset;
    /// the host is expected to disable the action, this is the backstop.
    pub async fn run_export(
        &self,
        config: ExportConfiguration,
        collections: ProjectCollections,
        tracker: Arc<ProgressTracker>,
        sink: Arc<dyn NotificationSink>,
        target: Arc<dyn SaveTarget>,
    ) -> Result<ExportReport, ExportError> {
        if !tracker.try_begin() {
            return Err(ExportError::BuildInProgress);
        }

        let total = enumerate::count_exportable(&config, &collections);
        let has_script = config.include_script && collections.script.is_some();
        if total == 0 && !has_script {
            tracker.reset();
            return Err(ExportError::NothingToExport);
        }

        let start = Instant::now();
        tracing::info!(
            "Starting export of '{}': {} items, organization {:?}",
            collections.project_name,
            total,
            config.organization
        );

        match self
            .run_build(&config, &collections, &tracker, target, total)
            .await
        {
            Ok(report) => {
                tracker.complete(report.files_written);
                self.metrics.record_export_completed();
                self.metrics.record_items_exported(report.files_written);
                self.metrics.record_items_skipped(report.files_skipped);
                self.metrics.record_build_time(start.elapsed());

                sink.success(&format!(
                    "Exported {} files to {}",
                    report.files_written, report.archive_path
                ));
                Ok(report)
            }
            Err(e) => {
                tracing::error!("Export failed: {e}");
                tracker.fail(&e.to_string());
                self.metrics.record_export_failed();

                sink.failure("Export failed. No archive was created.");
                Err(e)
            }
        }
    }

    /// The fallible middle of a build. Anything that errors here goes
    /// through the single catch in `run_export`; delivery is never
    /// reached past a failure.
    async fn run_build(
        &self,
        config: &ExportConfiguration,
        collections: &ProjectCollections,
        tracker: &Arc<ProgressTracker>,
        target: Arc<dyn SaveTarget>,
        total: usize,
    ) -> Result<ExportReport, ExportError> {
        let items = enumerate::produce_ordered_items(config, collections);
        tracker.begin_processing(total);

        for item in &items {
            tracker.record_item(&item.file_name);
        }

        let tree = assemble::build_tree(config, collections, &items)?;
        tracker.begin_compressing();

        let progress_tracker = Arc::clone(tracker);
        let output: PackageOutput = tokio::task::spawn_blocking(move || {
            package::compress_tree(&tree, |percent| {
                progress_tracker.set_compression_progress(percent);
            })
        })
        .await
        .map_err(|e| ExportError::Task(e.to_string()))??;

        let files_written = output.files_written;
        let files_skipped = output.files_skipped;
        let bytes = output.bytes;
        self.metrics.record_bytes_written(bytes.len() as u64);

        let file_name = assemble::archive_file_name(&collections.project_name);
        let archive_path =
            tokio::task::spawn_blocking(move || target.deliver(&file_name, &bytes))
                .await
                .map_err(|e| ExportError::Task(e.to_string()))??;

        Ok(ExportReport {
            archive_path,
            total_items: total,
            files_written,
            files_skipped,
        })
    }
}

impl Default for ExportService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::DirectorySaveTarget;
    use crate::models::{Beat, ScriptData, ShotImage};
    use crate::notify::LogNotifier;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    const PIXEL: &str = "iVBORw0KGgo=";

    fn collections() -> ProjectCollections {
        ProjectCollections {
            project_name: "Demo Reel".to_string(),
            script: Some(ScriptData {
                beats: vec![Beat {
                    id: "b1".to_string(),
                    title: "Opening".to_string(),
                    description: String::new(),
                    shot_images: vec![ShotImage {
                        id: "s1".to_string(),
                        data: PIXEL.to_string(),
                    }],
                    sequence_grid: None,
                }],
                ..ScriptData::default()
            }),
            ..ProjectCollections::default()
        }
    }

    #[tokio::test]
    async fn test_successful_build_delivers_archive() {
        let temp_dir = TempDir::new().unwrap();
        let dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();

        let service = ExportService::new();
        let tracker = Arc::new(ProgressTracker::new());
        let report = service
            .run_export(
                ExportConfiguration::default(),
                collections(),
                Arc::clone(&tracker),
                Arc::new(LogNotifier),
                Arc::new(DirectorySaveTarget::new(&dir)),
            )
            .await
            .unwrap();

        assert_eq!(report.files_written, 1);
        assert_eq!(report.archive_path, dir.join("demo_reel_archive.zip"));
        assert!(report.archive_path.exists());
    }

    #[tokio::test]
    async fn test_nothing_to_export_is_rejected_before_start() {
        let service = ExportService::new();
        let tracker = Arc::new(ProgressTracker::new());
        let temp_dir = TempDir::new().unwrap();
        let dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();

        let config = ExportConfiguration {
            include_panels: false,
            include_characters: false,
            include_locations: false,
            include_library: false,
            include_generations: false,
            include_script: false,
            ..ExportConfiguration::default()
        };

        let result = service
            .run_export(
                config,
                collections(),
                Arc::clone(&tracker),
                Arc::new(LogNotifier),
                Arc::new(DirectorySaveTarget::new(&dir)),
            )
            .await;

        assert!(matches!(result, Err(ExportError::NothingToExport)));
        assert!(!tracker.snapshot().in_progress);
    }

    #[tokio::test]
    async fn test_script_only_build_is_allowed() {
        let temp_dir = TempDir::new().unwrap();
        let dir = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();

        let config = ExportConfiguration {
            include_panels: false,
            include_characters: false,
            include_locations: false,
            include_library: false,
            include_generations: false,
            ..ExportConfiguration::default()
        };

        let service = ExportService::new();
        let report = service
            .run_export(
                config,
                collections(),
                Arc::new(ProgressTracker::new()),
                Arc::new(LogNotifier),
                Arc::new(DirectorySaveTarget::new(&dir)),
            )
            .await
            .unwrap();

        // script.json is not an item but still makes a one-file archive.
        assert_eq!(report.total_items, 0);
        assert_eq!(report.files_written, 1);
    }
}
