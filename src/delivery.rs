//! Delivery of the finished archive through the host's save-file
//! capability.
//!
//! The byte stream is write-once: the export service hands it over and
//! discards it. Two targets are provided — a fixed directory for hosts
//! (and tests) that already know where the archive goes, and a native
//! save dialog backed by `rfd`.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use thiserror::Error;

/// Errors raised while handing the archive to the host.
#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("save dialog was cancelled")]
    Cancelled,

    #[error("destination path is not valid UTF-8")]
    NonUtf8Path,

    #[error("failed to write archive: {0}")]
    Io(#[from] std::io::Error),
}

/// Terminal stage of a build: persists the finished byte stream.
pub trait SaveTarget: Send + Sync {
    /// Write `bytes` under `file_name`, returning the final path.
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<Utf8PathBuf, DeliveryError>;
}

/// Writes the archive into a fixed directory.
#[derive(Debug, Clone)]
pub struct DirectorySaveTarget {
    dir: Utf8PathBuf,
}

impl DirectorySaveTarget {
    pub fn new<P: AsRef<Utf8Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl SaveTarget for DirectorySaveTarget {
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<Utf8PathBuf, DeliveryError> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        let path = self.dir.join(file_name);
        fs::write(&path, bytes)?;
        tracing::info!("Archive delivered to {}", path);
        Ok(path)
    }
}

/// Prompts the user with a native save dialog seeded with the archive
/// file name. Cancelling the dialog is reported as
/// [`DeliveryError::Cancelled`], distinct from an I/O failure.
#[derive(Debug, Default)]
pub struct DialogSaveTarget;

impl SaveTarget for DialogSaveTarget {
    fn deliver(&self, file_name: &str, bytes: &[u8]) -> Result<Utf8PathBuf, DeliveryError> {
        let chosen = rfd::FileDialog::new()
            .set_title("Save project archive")
            .set_file_name(file_name)
            .save_file()
            .ok_or(DeliveryError::Cancelled)?;

        let path = Utf8PathBuf::from_path_buf(chosen).map_err(|_| DeliveryError::NonUtf8Path)?;
        fs::write(&path, bytes)?;
        tracing::info!("Archive delivered to {}", path);
        Ok(path)
    }
}
