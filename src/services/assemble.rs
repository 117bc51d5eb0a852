//! Archive tree assembly.
//!
//! Turns the enumerator's ordered item list into a folder/file tree
//! honoring the organization mode. Payloads stay base64 at this layer;
//! decoding happens in the packager. Every file path must be unique
//! within one build — a collision is an invariant violation and fails
//! the assembly rather than silently renaming anything.

use crate::models::{ExportConfiguration, OrganizationMode, ProjectCollections};
use crate::services::enumerate::{ExportableItem, ItemPayload};
use crate::services::naming;
use std::collections::HashSet;
use thiserror::Error;

/// Errors raised while building the archive tree.
#[derive(Error, Debug)]
pub enum AssembleError {
    #[error("duplicate archive path: {0}")]
    DuplicatePath(String),

    #[error("failed to encode script metadata: {0}")]
    ScriptEncode(#[from] serde_json::Error),
}

/// A file node: unique archive-relative path plus its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFile {
    pub path: String,
    pub payload: ItemPayload,
}

/// A folder node. The top of the tree has an empty path; the project
/// root folder and any category subfolders hang beneath it.
#[derive(Debug, Clone, Default)]
pub struct ArchiveFolder {
    pub path: String,
    pub folders: Vec<ArchiveFolder>,
    pub files: Vec<ArchiveFile>,
}

impl ArchiveFolder {
    fn new(path: String) -> Self {
        Self {
            path,
            folders: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Find or create a direct subfolder by name.
    fn child_mut(&mut self, name: &str) -> &mut ArchiveFolder {
        let child_path = if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.path, name)
        };
        if let Some(position) = self.folders.iter().position(|f| f.path == child_path) {
            &mut self.folders[position]
        } else {
            self.folders.push(ArchiveFolder::new(child_path));
            self.folders.last_mut().unwrap()
        }
    }

    fn push_file(&mut self, name: &str, payload: ItemPayload) {
        let path = if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.path, name)
        };
        self.files.push(ArchiveFile { path, payload });
    }

    /// Total number of file nodes in this subtree.
    pub fn file_count(&self) -> usize {
        self.files.len() + self.folders.iter().map(|f| f.file_count()).sum::<usize>()
    }

    /// All folder paths, top-down, excluding the unnamed top.
    pub fn folder_paths(&self) -> Vec<&str> {
        let mut paths = Vec::new();
        self.collect_folder_paths(&mut paths);
        paths
    }

    fn collect_folder_paths<'a>(&'a self, paths: &mut Vec<&'a str>) {
        if !self.path.is_empty() {
            paths.push(&self.path);
        }
        for folder in &self.folders {
            folder.collect_folder_paths(paths);
        }
    }

    /// All file nodes, depth-first, in assembly order.
    pub fn all_files(&self) -> Vec<&ArchiveFile> {
        let mut files = Vec::new();
        self.collect_files(&mut files);
        files
    }

    fn collect_files<'a>(&'a self, files: &mut Vec<&'a ArchiveFile>) {
        for file in &self.files {
            files.push(file);
        }
        for folder in &self.folders {
            folder.collect_files(files);
        }
    }
}

/// Name of the delivered archive: `<sanitized-project-or-"project">_archive.zip`.
pub fn archive_file_name(project_name: &str) -> String {
    format!("{}_archive.zip", naming::sanitize(project_name, "project"))
}

/// Build the archive tree for one build.
///
/// `by-type` nests each produced category in its own subfolder beneath
/// the project root; `flat` puts every file directly under the root.
/// `by-beat` is accepted but currently degrades to the `by-type` layout
/// (see DESIGN.md). The script metadata file, when included, is always
/// `script.json` at the archive root, independent of organization mode.
pub fn build_tree(
    config: &ExportConfiguration,
    collections: &ProjectCollections,
    items: &[ExportableItem],
) -> Result<ArchiveFolder, AssembleError> {
    let mut top = ArchiveFolder::new(String::new());

    if config.include_script {
        if let Some(script) = &collections.script {
            let json = serde_json::to_string_pretty(script)?;
            top.push_file("script.json", ItemPayload::Text(json));
        }
    }

    let root_name = naming::sanitize(&collections.project_name, "project");
    let root = top.child_mut(&root_name);

    for item in items {
        match config.organization {
            OrganizationMode::Flat => {
                root.push_file(&item.file_name, item.payload.clone());
            }
            OrganizationMode::ByType | OrganizationMode::ByBeat => {
                root.child_mut(item.category.folder())
                    .push_file(&item.file_name, item.payload.clone());
            }
        }
    }

    let mut seen = HashSet::new();
    for file in top.all_files() {
        if !seen.insert(file.path.as_str()) {
            return Err(AssembleError::DuplicatePath(file.path.clone()));
        }
    }

    Ok(top)
}
