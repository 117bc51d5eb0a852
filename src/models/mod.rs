//! Data models for the storypack export builder.
//!
//! This module contains the core data structures used throughout the crate:
//!
//! - [`ExportConfiguration`]: the user's export choices (organization mode,
//!   format/quality metadata, per-category include flags), frozen per build
//! - [`ExportState`] / [`ExportPhase`]: progress and phase of one build
//! - Project input records ([`ProjectCollections`], [`ScriptData`], beats,
//!   characters, locations, history images, library assets) — the in-memory
//!   collections the host hands to the builder

pub mod config;
pub mod export_state;
pub mod project;

pub use config::{ExportConfiguration, ExportPrefs, ImageFormat, OrganizationMode, QualityMode};
pub use export_state::{COMPRESSING_FLOOR_PERCENT, ExportPhase, ExportState};
pub use project::{
    Beat, CharacterRecord, GeneratedImage, LibraryAsset, LocationRecord, ProjectCollections,
    ScriptData, ShotImage,
};
