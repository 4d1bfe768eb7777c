//! Grayscale conversion and Otsu binarization.
//!
//! Produces the ink mask that contour detection runs on. Ink pixels are 255,
//! background pixels are 0.

use image::{DynamicImage, GrayImage, Luma};
use imageproc::stats::histogram;
use tracing::debug;

/// Which class of the binarized image is treated as ink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Polarity {
    /// Dark strokes on a light background. Pixels at or below the
    /// threshold are ink.
    #[default]
    DarkInk,
    /// Like `DarkInk`, but the mask is flipped when the ink class covers
    /// more than half the image, so light strokes on a dark background
    /// still come out as ink.
    Auto,
}

/// Convert any decoded image to 8-bit grayscale.
///
/// Uses the BT.601 luma weights (0.299, 0.587, 0.114), rounded. Gray
/// sources keep their exact values.
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    if let DynamicImage::ImageLuma8(gray) = img {
        return gray.clone();
    }

    let rgb = img.to_rgb8();
    let mut output = GrayImage::new(rgb.width(), rgb.height());
    for (x, y, pixel) in rgb.enumerate_pixels() {
        let [r, g, b] = pixel.0.map(u32::from);
        let luma = (299 * r + 587 * g + 114 * b + 500) / 1000;
        output.put_pixel(x, y, Luma([luma as u8]));
    }
    output
}

/// Compute the Otsu threshold of a grayscale image.
///
/// A uniform image yields 0.
pub fn otsu_threshold(gray: &GrayImage) -> u8 {
    let hist = histogram(gray);
    let level = otsu_level_from_histogram(&hist.channels[0]);
    debug!(level, "Computed Otsu threshold");
    level
}

/// Otsu level of a 256-bin histogram.
///
/// Picks the level maximizing between-class variance, where the lower class
/// holds every value <= level. Sums are kept in 64-bit so very large images
/// cannot overflow them.
pub fn otsu_level_from_histogram(hist: &[u32; 256]) -> u8 {
    let total: u64 = hist.iter().map(|&h| u64::from(h)).sum();
    let total_sum: u64 = hist
        .iter()
        .enumerate()
        .map(|(level, &h)| level as u64 * u64::from(h))
        .sum();

    let mut background_weight = 0u64;
    let mut background_sum = 0u64;
    let mut best_variance = 0f64;
    let mut best_level = 0u8;

    for (level, &count) in hist.iter().enumerate() {
        background_weight += u64::from(count);
        if background_weight == 0 {
            continue;
        }
        let foreground_weight = total - background_weight;
        if foreground_weight == 0 {
            break;
        }

        background_sum += level as u64 * u64::from(count);
        let background_mean = background_sum as f64 / background_weight as f64;
        let foreground_mean = (total_sum - background_sum) as f64 / foreground_weight as f64;

        let variance = background_weight as f64
            * foreground_weight as f64
            * (background_mean - foreground_mean).powi(2);
        if variance > best_variance {
            best_variance = variance;
            best_level = level as u8;
        }
    }

    best_level
}

/// Inverted binary threshold.
///
/// Pixels with values <= `threshold` become ink (255), others become
/// background (0).
pub fn binarize_inverted(gray: &GrayImage, threshold: u8) -> GrayImage {
    let (width, height) = gray.dimensions();
    debug!(width, height, threshold, "Applying inverted threshold");

    let mut output = GrayImage::new(width, height);
    for (x, y, pixel) in gray.enumerate_pixels() {
        let val = if pixel.0[0] <= threshold { 255 } else { 0 };
        output.put_pixel(x, y, Luma([val]));
    }

    output
}

/// Grayscale + Otsu + inverted threshold, honoring `polarity`.
pub fn binarize(img: &DynamicImage, polarity: Polarity) -> GrayImage {
    let gray = to_grayscale(img);
    let level = otsu_threshold(&gray);
    let mut mask = binarize_inverted(&gray, level);

    if polarity == Polarity::Auto && ink_is_majority(&mask) {
        debug!("Ink class covers most of the image, flipping mask");
        for pixel in mask.pixels_mut() {
            pixel.0[0] = 255 - pixel.0[0];
        }
    }

    mask
}

fn ink_is_majority(mask: &GrayImage) -> bool {
    let total = u64::from(mask.width()) * u64::from(mask.height());
    let ink = mask.pixels().filter(|p| p.0[0] != 0).count() as u64;
    ink * 2 > total
}
