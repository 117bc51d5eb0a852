//! Asset enumeration: counting and ordered production of exportable items.
//!
//! Two entry points, [`count_exportable`] and [`produce_ordered_items`],
//! which agree on well-formed input. Production runs a fixed sequence of
//! pure category handlers, each threading an explicit [`Counters`]
//! accumulator, so the ordering rules stay auditable in one place and
//! the whole pass is unit-testable without any UI.
//!
//! Production order: panels (beats in script order, shots in id order,
//! then the beat's grid) → linked-beat images (grouped by beat id in
//! first-seen order, continuing the panel counter) → characters (sheet
//! before expressions) → locations → library assets → generations.
//! The same input always yields the same ordered file list.

use crate::models::{ExportConfiguration, GeneratedImage, ProjectCollections};
use crate::services::naming;
use indexmap::IndexMap;

/// Category of an exportable item, also the by-type folder it lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemCategory {
    Panel,
    Character,
    Location,
    Library,
    Generation,
}

impl ItemCategory {
    /// Subfolder name used by the by-type archive layout.
    pub fn folder(&self) -> &'static str {
        match self {
            ItemCategory::Panel => "panels",
            ItemCategory::Character => "characters",
            ItemCategory::Location => "locations",
            ItemCategory::Library => "library",
            ItemCategory::Generation => "generations",
        }
    }
}

/// Raw payload of an item: base64 image data or UTF-8 text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemPayload {
    Image(String),
    Text(String),
}

/// One file-to-be, fully named but not yet placed in a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportableItem {
    pub category: ItemCategory,
    pub source_id: String,
    pub payload: ItemPayload,
    pub file_name: String,
}

/// Per-category sequence counters threaded through the handler pipeline.
///
/// Monotonically non-decreasing for the lifetime of one build; never
/// reset mid-run. The panel counter is shared between the per-beat pass
/// and the linked-image pass, which is what guarantees those two passes
/// cannot collide in flat mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub panel: usize,
    pub character: usize,
    pub location: usize,
    pub library: usize,
    pub generation: usize,
}

type Handler =
    fn(&ExportConfiguration, &ProjectCollections, Counters) -> (Vec<ExportableItem>, Counters);

/// The fixed production order. Changing this list changes the archive;
/// it is load-bearing for determinism, not a style choice.
const HANDLERS: [Handler; 6] = [
    panel_items,
    linked_panel_items,
    character_items,
    location_items,
    library_items,
    generation_items,
];

/// Count the items a build over these collections will produce.
///
/// The count is computed without touching payloads, so an item whose
/// payload later fails to decode is still counted; it simply produces no
/// file (soft failure, not an undercount bug). Script metadata
/// contributes zero — it is a single fixed file, not an item.
pub fn count_exportable(config: &ExportConfiguration, collections: &ProjectCollections) -> usize {
    let mut total = 0;

    if config.include_panels {
        if let Some(script) = &collections.script {
            for beat in &script.beats {
                total += beat.shot_images.len();
                if beat.sequence_grid.is_some() {
                    total += 1;
                }
            }
        }
        // Every linked history image counts once, regardless of how many
        // share a beat.
        total += collections
            .image_history
            .iter()
            .filter(|img| img.linked_beat_id.is_some())
            .count();
    }

    if config.include_characters {
        if let Some(script) = &collections.script {
            for character in &script.characters {
                if character.sheet.is_some() {
                    total += 1;
                }
                if character.expressions.is_some() {
                    total += 1;
                }
            }
        }
    }

    if config.include_locations {
        if let Some(script) = &collections.script {
            total += script
                .locations
                .iter()
                .filter(|location| location.anchor.is_some())
                .count();
        }
    }

    if config.include_library {
        total += collections.library.len();
    }

    if config.include_generations {
        total += collections
            .image_history
            .iter()
            .filter(|img| img.linked_beat_id.is_none())
            .count();
    }

    total
}

/// Produce the ordered item list for one build.
///
/// Must agree with [`count_exportable`] on well-formed input; the pair
/// is implemented independently on purpose so tests can hold them
/// against each other.
pub fn produce_ordered_items(
    config: &ExportConfiguration,
    collections: &ProjectCollections,
) -> Vec<ExportableItem> {
    let mut items = Vec::new();
    let mut counters = Counters::default();

    for handler in HANDLERS {
        let (mut produced, updated) = handler(config, collections, counters);
        items.append(&mut produced);
        counters = updated;
    }

    items
}

/// Per-beat pass: shots in original id order, then the sequence grid.
///
/// The beat counter advances for every beat, including beats that
/// produce no files; the resulting numbering gap is expected and is
/// never compacted.
fn panel_items(
    config: &ExportConfiguration,
    collections: &ProjectCollections,
    mut counters: Counters,
) -> (Vec<ExportableItem>, Counters) {
    let mut items = Vec::new();

    if !config.include_panels {
        return (items, counters);
    }
    let Some(script) = &collections.script else {
        return (items, counters);
    };

    for beat in &script.beats {
        counters.panel += 1;
        let seq = counters.panel;
        let slug = naming::sanitize(&beat.title, &format!("beat_{seq}"));

        let shot_count = beat.shot_images.len();
        for (index, shot) in beat.shot_images.iter().enumerate() {
            items.push(ExportableItem {
                category: ItemCategory::Panel,
                source_id: shot.id.clone(),
                payload: ItemPayload::Image(shot.data.clone()),
                file_name: naming::panel_shot_name(
                    seq,
                    &slug,
                    index + 1,
                    shot_count,
                    config.image_format,
                ),
            });
        }

        if let Some(grid) = &beat.sequence_grid {
            items.push(ExportableItem {
                category: ItemCategory::Panel,
                source_id: beat.id.clone(),
                payload: ItemPayload::Image(grid.clone()),
                file_name: naming::panel_grid_name(seq, &slug, config.image_format),
            });
        }
    }

    (items, counters)
}

/// Linked-image pass: history images carrying a beat link, grouped by
/// beat id in first-seen order, each group in original array order.
/// Continues the panel counter rather than restarting it.
fn linked_panel_items(
    config: &ExportConfiguration,
    collections: &ProjectCollections,
    mut counters: Counters,
) -> (Vec<ExportableItem>, Counters) {
    let mut items = Vec::new();

    if !config.include_panels {
        return (items, counters);
    }

    let mut groups: IndexMap<&str, Vec<&GeneratedImage>> = IndexMap::new();
    for image in &collections.image_history {
        if let Some(beat_id) = &image.linked_beat_id {
            groups.entry(beat_id.as_str()).or_default().push(image);
        }
    }

    for (beat_id, images) in groups {
        counters.panel += 1;
        let seq = counters.panel;

        let beat_title = collections
            .script
            .as_ref()
            .and_then(|script| script.beats.iter().find(|beat| beat.id == beat_id))
            .map(|beat| beat.title.as_str())
            .unwrap_or(beat_id);
        let slug = naming::sanitize(beat_title, &format!("beat_{seq}"));

        let group_len = images.len();
        for (index, image) in images.iter().enumerate() {
            items.push(ExportableItem {
                category: ItemCategory::Panel,
                source_id: image.id.clone(),
                payload: ItemPayload::Image(image.data.clone()),
                file_name: naming::linked_image_name(
                    seq,
                    &slug,
                    index + 1,
                    group_len,
                    config.image_format,
                ),
            });
        }
    }

    (items, counters)
}

/// Characters in original order, sheet before expression grid.
fn character_items(
    config: &ExportConfiguration,
    collections: &ProjectCollections,
    mut counters: Counters,
) -> (Vec<ExportableItem>, Counters) {
    let mut items = Vec::new();

    if !config.include_characters {
        return (items, counters);
    }
    let Some(script) = &collections.script else {
        return (items, counters);
    };

    for character in &script.characters {
        counters.character += 1;
        let index = counters.character;
        let slug = naming::sanitize(&character.name, "character");

        if let Some(sheet) = &character.sheet {
            items.push(ExportableItem {
                category: ItemCategory::Character,
                source_id: character.name.clone(),
                payload: ItemPayload::Image(sheet.clone()),
                file_name: naming::indexed_name(index, &slug, Some("sheet"), config.image_format),
            });
        }

        if let Some(expressions) = &character.expressions {
            items.push(ExportableItem {
                category: ItemCategory::Character,
                source_id: character.name.clone(),
                payload: ItemPayload::Image(expressions.clone()),
                file_name: naming::indexed_name(
                    index,
                    &slug,
                    Some("expressions"),
                    config.image_format,
                ),
            });
        }
    }

    (items, counters)
}

/// Locations in original order, anchor image only.
fn location_items(
    config: &ExportConfiguration,
    collections: &ProjectCollections,
    mut counters: Counters,
) -> (Vec<ExportableItem>, Counters) {
    let mut items = Vec::new();

    if !config.include_locations {
        return (items, counters);
    }
    let Some(script) = &collections.script else {
        return (items, counters);
    };

    for location in &script.locations {
        counters.location += 1;
        let index = counters.location;

        if let Some(anchor) = &location.anchor {
            let slug = naming::sanitize(&location.name, "location");
            items.push(ExportableItem {
                category: ItemCategory::Location,
                source_id: location.name.clone(),
                payload: ItemPayload::Image(anchor.clone()),
                file_name: naming::indexed_name(index, &slug, None, config.image_format),
            });
        }
    }

    (items, counters)
}

/// Library assets in original order, unconditionally one item per asset.
fn library_items(
    config: &ExportConfiguration,
    collections: &ProjectCollections,
    mut counters: Counters,
) -> (Vec<ExportableItem>, Counters) {
    let mut items = Vec::new();

    if !config.include_library {
        return (items, counters);
    }

    for asset in &collections.library {
        counters.library += 1;
        let slug = naming::sanitize(&asset.name, "asset");
        items.push(ExportableItem {
            category: ItemCategory::Library,
            source_id: asset.id.clone(),
            payload: ItemPayload::Image(asset.data.clone()),
            file_name: naming::counted_name(counters.library, &slug, config.image_format),
        });
    }

    (items, counters)
}

/// Ad-hoc generations: history images with no beat link, original order.
fn generation_items(
    config: &ExportConfiguration,
    collections: &ProjectCollections,
    mut counters: Counters,
) -> (Vec<ExportableItem>, Counters) {
    let mut items = Vec::new();

    if !config.include_generations {
        return (items, counters);
    }

    for image in &collections.image_history {
        if image.linked_beat_id.is_some() {
            continue;
        }
        counters.generation += 1;
        let slug = naming::sanitize(&image.prompt, "generation");
        items.push(ExportableItem {
            category: ItemCategory::Generation,
            source_id: image.id.clone(),
            payload: ItemPayload::Image(image.data.clone()),
            file_name: naming::counted_name(counters.generation, &slug, config.image_format),
        });
    }

    (items, counters)
}
