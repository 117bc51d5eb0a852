//! Compression and packaging.
//!
//! Serializes an assembled tree into one in-memory zip byte stream.
//! Base64 image payloads are decoded here; a payload that fails to
//! decode is skipped with a warning and the build keeps going (the item
//! stays counted in the processing total — soft failure isolation).
//! Zip-level errors are fatal: the partial buffer is discarded and the
//! error propagates so no broken archive can ever reach delivery.

use crate::services::assemble::ArchiveFolder;
use crate::services::enumerate::ItemPayload;
use base64::{Engine as _, engine::general_purpose};
use std::io::{Cursor, Write};
use thiserror::Error;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// Deflate level used for every entry. Moderate on purpose: the bulk of
/// the payload is already-compressed photographic data, where higher
/// levels cost time for no measurable gain.
const COMPRESSION_LEVEL: i64 = 6;

/// Errors raised while serializing the archive.
#[derive(Error, Debug)]
pub enum PackageError {
    #[error("could not create archive root: {0}")]
    RootCreate(#[source] zip::result::ZipError),

    #[error("zip serialization failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("archive stream failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Finished archive bytes plus write accounting.
#[derive(Debug)]
pub struct PackageOutput {
    pub bytes: Vec<u8>,
    pub files_written: usize,
    pub files_skipped: usize,
}

/// Compress the assembled tree into a zip byte stream.
///
/// `on_progress` receives a monotonically non-decreasing percentage as
/// entries are serialized, ending at 100. This is the stream signal the
/// host floors its bar with during the compressing phase; it is not the
/// per-item processing counter and must never be summed with it.
pub fn compress_tree(
    tree: &ArchiveFolder,
    mut on_progress: impl FnMut(u8),
) -> Result<PackageOutput, PackageError> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL));

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    // Directories first, root before anything else, so a root-creation
    // failure aborts before a single file is written.
    for (index, folder_path) in tree.folder_paths().into_iter().enumerate() {
        writer
            .add_directory(folder_path, options)
            .map_err(|e| {
                if index == 0 {
                    PackageError::RootCreate(e)
                } else {
                    PackageError::Zip(e)
                }
            })?;
    }

    let files = tree.all_files();
    let total = files.len().max(1);
    let mut handled = 0usize;
    let mut files_written = 0usize;
    let mut files_skipped = 0usize;
    let mut last_percent = 0u8;

    for file in files {
        let bytes = match &file.payload {
            ItemPayload::Image(encoded) => match general_purpose::STANDARD.decode(encoded) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!("Skipping {}: payload failed to decode ({})", file.path, e);
                    handled += 1;
                    files_skipped += 1;
                    continue;
                }
            },
            ItemPayload::Text(text) => text.clone().into_bytes(),
        };

        writer.start_file(file.path.as_str(), options)?;
        writer.write_all(&bytes)?;

        handled += 1;
        files_written += 1;

        let percent = ((handled * 100) / total) as u8;
        if percent > last_percent {
            last_percent = percent;
            on_progress(percent);
        }
    }

    let cursor = writer.finish()?;

    if last_percent < 100 {
        on_progress(100);
    }

    tracing::debug!(
        "Compressed archive: {} files written, {} skipped, {} bytes",
        files_written,
        files_skipped,
        cursor.get_ref().len()
    );

    Ok(PackageOutput {
        bytes: cursor.into_inner(),
        files_written,
        files_skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExportConfiguration, ProjectCollections};
    use crate::services::assemble::build_tree;
    use crate::services::enumerate::{ExportableItem, ItemCategory};
    use std::io::Read;
    use zip::ZipArchive;

    const PIXEL: &str = "iVBORw0KGgo=";

    fn item(file_name: &str, payload: &str) -> ExportableItem {
        ExportableItem {
            category: ItemCategory::Library,
            source_id: file_name.to_string(),
            payload: ItemPayload::Image(payload.to_string()),
            file_name: file_name.to_string(),
        }
    }

    fn tree_of(items: &[ExportableItem]) -> ArchiveFolder {
        let config = ExportConfiguration {
            include_script: false,
            ..ExportConfiguration::default()
        };
        let collections = ProjectCollections {
            project_name: "clip".to_string(),
            ..ProjectCollections::default()
        };
        build_tree(&config, &collections, items).unwrap()
    }

    #[test]
    fn test_round_trip_through_zip_reader() {
        let tree = tree_of(&[item("001_sky.png", PIXEL), item("002_sea.png", PIXEL)]);

        let output = compress_tree(&tree, |_| {}).unwrap();
        assert_eq!(output.files_written, 2);
        assert_eq!(output.files_skipped, 0);

        let mut archive = ZipArchive::new(Cursor::new(output.bytes)).unwrap();
        let mut entry = archive.by_name("clip/library/001_sky.png").unwrap();
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).unwrap();
        assert_eq!(bytes, general_purpose::STANDARD.decode(PIXEL).unwrap());
    }

    #[test]
    fn test_malformed_payload_is_skipped_not_fatal() {
        let tree = tree_of(&[item("001_good.png", PIXEL), item("002_bad.png", "%%%")]);

        let output = compress_tree(&tree, |_| {}).unwrap();
        assert_eq!(output.files_written, 1);
        assert_eq!(output.files_skipped, 1);

        let archive = ZipArchive::new(Cursor::new(output.bytes)).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        assert!(names.contains(&"clip/library/001_good.png"));
        assert!(!names.contains(&"clip/library/002_bad.png"));
    }

    #[test]
    fn test_progress_is_monotone_and_ends_at_hundred() {
        let items: Vec<ExportableItem> = (1..=10)
            .map(|i| item(&format!("{:03}_frame.png", i), PIXEL))
            .collect();
        let tree = tree_of(&items);

        let mut reported = Vec::new();
        compress_tree(&tree, |pct| reported.push(pct)).unwrap();

        assert!(reported.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(*reported.last().unwrap(), 100);
    }

    #[test]
    fn test_text_payload_round_trips_utf8() {
        let config = ExportConfiguration::default();
        let collections = ProjectCollections {
            project_name: "clip".to_string(),
            script: Some(Default::default()),
            ..ProjectCollections::default()
        };
        let tree = build_tree(&config, &collections, &[]).unwrap();

        let output = compress_tree(&tree, |_| {}).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(output.bytes)).unwrap();
        let mut entry = archive.by_name("script.json").unwrap();
        let mut text = String::new();
        entry.read_to_string(&mut text).unwrap();
        assert!(text.contains("\"beats\""));
    }

    #[test]
    fn test_empty_tree_still_yields_valid_archive() {
        let tree = tree_of(&[]);
        let output = compress_tree(&tree, |_| {}).unwrap();
        assert_eq!(output.files_written, 0);

        let archive = ZipArchive::new(Cursor::new(output.bytes)).unwrap();
        assert_eq!(archive.len(), 1); // the root directory entry
    }
}
