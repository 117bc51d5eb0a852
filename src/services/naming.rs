//! Naming policy for archive entries.
//!
//! Pure functions from an item's suggested name and positional counters
//! to a file name. The assembler combines these names with the folder
//! layout; nothing here touches payload bytes, and the extension follows
//! the selected format option only (no transcoding happens anywhere).

use crate::models::ImageFormat;

/// Maximum length of a sanitized name fragment.
pub const MAX_SLUG_LEN: usize = 30;

/// Sanitize free-form text into a file-name fragment.
///
/// Keeps ASCII letters and digits, replaces every other character with
/// `_`, lowercases, truncates to [`MAX_SLUG_LEN`], and strips leading and
/// trailing underscores. A fragment that ends up empty falls back to the
/// caller's category default (`project`, `beat_<n>`, `character`, ...).
pub fn sanitize(text: &str, fallback: &str) -> String {
    let filtered: String = text
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .take(MAX_SLUG_LEN)
        .collect();

    let trimmed = filtered.trim_matches('_');
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Shot image name: `NNN_<slug>.<ext>`, or `NNN_<slug>.<i>.<ext>` when
/// the beat has more than one shot. The single-shot case never gets a
/// suffix.
pub fn panel_shot_name(
    seq: usize,
    slug: &str,
    shot_index: usize,
    shot_count: usize,
    format: ImageFormat,
) -> String {
    if shot_count > 1 {
        format!("{:03}_{}.{}.{}", seq, slug, shot_index, format.extension())
    } else {
        format!("{:03}_{}.{}", seq, slug, format.extension())
    }
}

/// Sequence-grid name: `NNN_<slug>_grid.<ext>`, sharing the beat's
/// sequence number with its shots.
pub fn panel_grid_name(seq: usize, slug: &str, format: ImageFormat) -> String {
    format!("{:03}_{}_grid.{}", seq, slug, format.extension())
}

/// Linked-image name: `NNN_<slug>_linked[.<i>].<ext>`.
///
/// `seq` comes from the same counter namespace as the main panel pass,
/// so a linked group can never collide with a beat's files even when
/// everything lands in one folder. The multi-image suffix rule matches
/// the shot rule.
pub fn linked_image_name(
    seq: usize,
    slug: &str,
    image_index: usize,
    group_len: usize,
    format: ImageFormat,
) -> String {
    if group_len > 1 {
        format!(
            "{:03}_{}_linked.{}.{}",
            seq,
            slug,
            image_index,
            format.extension()
        )
    } else {
        format!("{:03}_{}_linked.{}", seq, slug, format.extension())
    }
}

/// Width-2 indexed name for character and location files:
/// `NN_<slug>[_<marker>].<ext>`.
pub fn indexed_name(
    index: usize,
    slug: &str,
    marker: Option<&str>,
    format: ImageFormat,
) -> String {
    match marker {
        Some(marker) => format!("{:02}_{}_{}.{}", index, slug, marker, format.extension()),
        None => format!("{:02}_{}.{}", index, slug, format.extension()),
    }
}

/// Width-3 counted name for library assets and ad-hoc generations:
/// `NNN_<slug>.<ext>`.
pub fn counted_name(seq: usize, slug: &str, format: ImageFormat) -> String {
    format!("{:03}_{}.{}", seq, slug, format.extension())
}
