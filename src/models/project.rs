use serde::{Deserialize, Serialize};

/// An image from the project's global generation history.
///
/// `data` is the base64-encoded image payload exactly as the host holds
/// it in memory; this crate never re-encodes pixels. An image carrying a
/// `linked_beat_id` is exported with the panels (start/end frames and the
/// like); an unlinked image belongs to the ad-hoc generations category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub id: String,

    #[serde(skip)]
    pub data: String,

    #[serde(default)]
    pub prompt: String,

    #[serde(default)]
    pub linked_beat_id: Option<String>,
}

/// A user-collected library asset (reference images, logos, plates).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryAsset {
    pub id: String,

    #[serde(skip)]
    pub data: String,

    #[serde(default)]
    pub asset_type: String,

    pub name: String,
}

/// One generated shot image belonging to a beat, in the beat's own order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShotImage {
    pub id: String,

    #[serde(skip)]
    pub data: String,
}

/// A discrete narrative unit of the script.
///
/// A beat owns zero or more shot images and at most one sequence grid, a
/// composite image summarizing its shots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beat {
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub shot_images: Vec<ShotImage>,

    #[serde(skip)]
    pub sequence_grid: Option<String>,
}

/// A script character with its optional generated imagery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(skip)]
    pub sheet: Option<String>,

    #[serde(skip)]
    pub expressions: Option<String>,
}

/// A script location with its optional anchor image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRecord {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(skip)]
    pub anchor: Option<String>,
}

/// Analyzed script data: beats, characters, and locations.
///
/// Serializes to the archive's `script.json`. Image payload fields are
/// marked `#[serde(skip)]` so the metadata file carries structure, ids,
/// titles and prompts but never base64 blobs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptData {
    #[serde(default)]
    pub beats: Vec<Beat>,

    #[serde(default)]
    pub characters: Vec<CharacterRecord>,

    #[serde(default)]
    pub locations: Vec<LocationRecord>,
}

/// Everything the export builder reads from the host, already resident
/// in memory. Collections keep the host's original ordering; the
/// enumerator depends on it for deterministic output.
#[derive(Debug, Clone, Default)]
pub struct ProjectCollections {
    pub project_name: String,
    pub image_history: Vec<GeneratedImage>,
    pub library: Vec<LibraryAsset>,
    pub script: Option<ScriptData>,
}
