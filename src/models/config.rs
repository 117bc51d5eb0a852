use serde::{Deserialize, Serialize};

/// Folder layout strategy applied when assembling the archive.
///
/// `ByBeat` is accepted and persisted but currently produces the same
/// layout as `ByType`; the enumerated categories have no per-beat folder
/// tree (see DESIGN.md).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrganizationMode {
    ByType,
    ByBeat,
    Flat,
}

/// Extension stamped on exported image files.
///
/// Metadata only: payloads are never transcoded, so selecting `Jpg` over
/// PNG-encoded sources yields a mislabeled extension. Known limitation of
/// the naming layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageFormat {
    Png,
    Jpg,
}

impl ImageFormat {
    /// File extension for this format, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
        }
    }
}

/// Recorded quality preference. Metadata only; no re-encoding happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QualityMode {
    Original,
    Optimized,
}

/// The user's export choices, frozen for the duration of one build.
///
/// All fields are mutually independent; there is no validation beyond
/// enum membership. The export view snapshots this by value when a build
/// starts, so concurrent edits in the host UI cannot affect a running
/// build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfiguration {
    #[serde(rename = "Organization", default = "default_organization")]
    pub organization: OrganizationMode,

    #[serde(rename = "Image Format", default = "default_image_format")]
    pub image_format: ImageFormat,

    #[serde(rename = "Quality", default = "default_quality")]
    pub quality: QualityMode,

    #[serde(rename = "Include Panels", default = "default_include")]
    pub include_panels: bool,

    #[serde(rename = "Include Characters", default = "default_include")]
    pub include_characters: bool,

    #[serde(rename = "Include Locations", default = "default_include")]
    pub include_locations: bool,

    #[serde(rename = "Include Library", default = "default_include")]
    pub include_library: bool,

    #[serde(rename = "Include Generations", default = "default_include")]
    pub include_generations: bool,

    #[serde(rename = "Include Script", default = "default_include")]
    pub include_script: bool,
}

impl Default for ExportConfiguration {
    fn default() -> Self {
        Self {
            organization: default_organization(),
            image_format: default_image_format(),
            quality: default_quality(),
            include_panels: true,
            include_characters: true,
            include_locations: true,
            include_library: true,
            include_generations: true,
            include_script: true,
        }
    }
}

fn default_organization() -> OrganizationMode {
    OrganizationMode::ByType
}

fn default_image_format() -> ImageFormat {
    ImageFormat::Png
}

fn default_quality() -> QualityMode {
    QualityMode::Original
}

fn default_include() -> bool {
    true
}

/// Preferences file wrapper for the export settings YAML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportPrefs {
    #[serde(rename = "Export Settings", default)]
    pub settings: ExportConfiguration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_defaults() {
        let config = ExportConfiguration::default();
        assert_eq!(config.organization, OrganizationMode::ByType);
        assert_eq!(config.image_format, ImageFormat::Png);
        assert_eq!(config.quality, QualityMode::Original);
        assert!(config.include_panels);
        assert!(config.include_script);
    }

    #[test]
    fn test_extension_follows_format() {
        assert_eq!(ImageFormat::Png.extension(), "png");
        assert_eq!(ImageFormat::Jpg.extension(), "jpg");
    }

    #[test]
    fn test_kebab_case_wire_names() {
        let yaml = serde_yaml_ng::to_string(&OrganizationMode::ByType).unwrap();
        assert_eq!(yaml.trim(), "by-type");

        let mode: OrganizationMode = serde_yaml_ng::from_str("by-beat").unwrap();
        assert_eq!(mode, OrganizationMode::ByBeat);
    }

    #[test]
    fn test_prefs_default_round_trip() {
        let prefs = ExportPrefs::default();
        let yaml = serde_yaml_ng::to_string(&prefs).unwrap();
        let loaded: ExportPrefs = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(loaded.settings, prefs.settings);
    }

    #[test]
    fn test_prefs_missing_fields_use_defaults() {
        let loaded: ExportPrefs =
            serde_yaml_ng::from_str("Export Settings:\n  Organization: flat\n").unwrap();
        assert_eq!(loaded.settings.organization, OrganizationMode::Flat);
        assert_eq!(loaded.settings.image_format, ImageFormat::Png);
        assert!(loaded.settings.include_library);
    }
}
