//! Character thumbnail extraction.
//!
//! Isolates the dominant ink blob of a scanned character image with Otsu
//! binarization and external contour detection, then crops it with padding
//! and resizes it to a fixed square thumbnail.

pub mod binarize;
pub mod contour;
pub mod extract;
pub mod region;
pub mod resize;

// Re-exports for convenience
pub use binarize::{
    Polarity, binarize, binarize_inverted, otsu_level_from_histogram, otsu_threshold, to_grayscale,
};
pub use contour::{bounding_region, contour_area, external_contours, largest_contour};
pub use extract::{ExtractError, ExtractOptions, Extraction, Miss, Thumbnail, extract};
pub use region::Region;
pub use resize::resize_to_square;

/// Edge length of the produced thumbnail in pixels.
pub const THUMBNAIL_SIZE: u32 = 100;

/// Pixels added on every side of the character's bounding rectangle.
pub const DEFAULT_PADDING: u32 = 5;

/// Smallest contour area accepted as a character rather than noise.
pub const DEFAULT_MIN_AREA: f64 = 100.0;
