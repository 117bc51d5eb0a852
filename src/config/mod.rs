use crate::models::ExportPrefs;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;

/// Manager for the export preferences YAML file.
///
/// The host remembers the user's last export choices between sessions;
/// the configuration itself is snapshotted per build and never read
/// from disk mid-run.
#[derive(Debug, Clone)]
pub struct PrefsManager {
    config_dir: Utf8PathBuf,
    prefs_path: Utf8PathBuf,
}

impl PrefsManager {
    /// Create a new PrefsManager rooted at the given directory.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            prefs_path: config_dir.join("Export Settings.yaml"),
            config_dir,
        })
    }

    /// Load the export preferences, falling back to defaults when the
    /// file does not exist yet.
    pub fn load_prefs(&self) -> Result<ExportPrefs> {
        if !self.prefs_path.exists() {
            tracing::warn!(
                "Export prefs not found at {}, using defaults",
                self.prefs_path
            );
            return Ok(ExportPrefs::default());
        }

        let file_contents = fs::read_to_string(&self.prefs_path)
            .with_context(|| format!("Failed to read export prefs: {}", self.prefs_path))?;

        let prefs: ExportPrefs = serde_yaml_ng::from_str(&file_contents)
            .with_context(|| format!("Failed to parse export prefs: {}", self.prefs_path))?;

        tracing::info!("Loaded export prefs from {}", self.prefs_path);
        Ok(prefs)
    }

    /// Save the export preferences.
    pub fn save_prefs(&self, prefs: &ExportPrefs) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(prefs).context("Failed to serialize export prefs to YAML")?;

        fs::write(&self.prefs_path, yaml_string)
            .with_context(|| format!("Failed to write export prefs: {}", self.prefs_path))?;

        tracing::info!("Saved export prefs to {}", self.prefs_path);
        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }
}
