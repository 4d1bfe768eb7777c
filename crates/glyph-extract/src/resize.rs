//! Square thumbnail resizing.

use image::DynamicImage;
use image::imageops::FilterType;
use tracing::debug;

/// Resize an image to exactly `size` x `size`.
///
/// Aspect ratio is not preserved; tall or wide crops are stretched to fill
/// the square. Returns the original image unchanged if it is already the
/// target size.
pub fn resize_to_square(img: &DynamicImage, size: u32, filter: FilterType) -> DynamicImage {
    let (orig_w, orig_h) = (img.width(), img.height());

    if orig_w == size && orig_h == size {
        debug!(size, "Image already at target size, skipping resize");
        return img.clone();
    }

    debug!(orig_w, orig_h, size, ?filter, "Resizing image to square");

    img.resize_exact(size, size, filter)
}
