//! All setting definitions with their default values.

use std::collections::HashMap;
use std::sync::LazyLock;

/// (key, default, description)
type DefTuple = (&'static str, &'static str, &'static str);

pub const OUTPUT_DIR: &str = "GLYPH_OUTPUT_DIR";
pub const PADDING: &str = "GLYPH_PADDING";
pub const MIN_AREA: &str = "GLYPH_MIN_AREA";
pub const JPEG_QUALITY: &str = "GLYPH_JPEG_QUALITY";
pub const POLARITY: &str = "GLYPH_POLARITY";

const DEFS: &[DefTuple] = &[
    (
        OUTPUT_DIR,
        "processed_images",
        "Directory that receives processed thumbnails",
    ),
    (
        PADDING,
        "5",
        "Pixels added around the character's bounding box",
    ),
    (
        MIN_AREA,
        "100",
        "Smallest contour area accepted as a character",
    ),
    (JPEG_QUALITY, "75", "JPEG quality of written thumbnails (1-100)"),
    (
        POLARITY,
        "dark",
        "Ink polarity: 'dark' for dark strokes, 'auto' to also accept light strokes",
    ),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Global setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// Setting keys in declaration order.
pub fn keys() -> impl Iterator<Item = &'static str> {
    DEFS.iter().map(|&(key, _, _)| key)
}

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}
