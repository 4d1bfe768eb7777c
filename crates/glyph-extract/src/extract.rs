//! The extraction pipeline: binarize, pick the largest external contour,
//! crop with padding, resize to a square thumbnail.

use image::DynamicImage;
use image::imageops::FilterType;
use tracing::debug;

use crate::binarize::{Polarity, binarize};
use crate::contour::{bounding_region, external_contours, largest_contour};
use crate::region::Region;
use crate::resize::resize_to_square;
use crate::{DEFAULT_MIN_AREA, DEFAULT_PADDING, THUMBNAIL_SIZE};

/// Options controlling extraction.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Pixels added around the character's bounding rectangle.
    pub padding: u32,

    /// Contours enclosing less than this area are treated as noise.
    pub min_area: f64,

    /// Edge length of the square thumbnail.
    pub output_size: u32,

    /// Which binarized class counts as ink.
    pub polarity: Polarity,

    /// Resampling filter for the final resize.
    pub filter: FilterType,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            min_area: DEFAULT_MIN_AREA,
            output_size: THUMBNAIL_SIZE,
            polarity: Polarity::DarkInk,
            filter: FilterType::Lanczos3,
        }
    }
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set padding.
    pub fn with_padding(mut self, val: u32) -> Self {
        self.padding = val;
        self
    }

    /// Builder: set minimum contour area.
    pub fn with_min_area(mut self, val: f64) -> Self {
        self.min_area = val;
        self
    }

    /// Builder: set thumbnail edge length.
    pub fn with_output_size(mut self, val: u32) -> Self {
        self.output_size = val;
        self
    }

    /// Builder: set ink polarity.
    pub fn with_polarity(mut self, val: Polarity) -> Self {
        self.polarity = val;
        self
    }

    /// Check that the options describe a usable pipeline.
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.output_size == 0 {
            return Err(ExtractError::InvalidOutputSize);
        }
        if !self.min_area.is_finite() || self.min_area < 0.0 {
            return Err(ExtractError::InvalidMinArea(self.min_area));
        }
        Ok(())
    }
}

/// Invalid extraction options.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("output size must be at least 1 pixel")]
    InvalidOutputSize,

    #[error("minimum area must be a finite non-negative number, got {0}")]
    InvalidMinArea(f64),
}

/// A successfully extracted character.
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    /// The square output image.
    pub image: DynamicImage,
    /// Padded region of the source image that was cropped.
    pub crop: Region,
    /// Area enclosed by the selected contour.
    pub area: f64,
}

/// Why no thumbnail was produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Miss {
    /// The image has no ink regions at all.
    NoContour,
    /// The largest ink region is smaller than the minimum area.
    TooSmall { area: f64 },
}

/// Outcome of one extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Found(Thumbnail),
    Missing(Miss),
}

/// Extract the dominant character of `image` as a square thumbnail.
///
/// Pure and deterministic: the same image and options always give the same
/// result. Options are expected to have passed [`ExtractOptions::validate`];
/// an output size of 0 is treated as 1.
pub fn extract(image: &DynamicImage, options: &ExtractOptions) -> Extraction {
    let (width, height) = (image.width(), image.height());
    debug!(width, height, "Extracting character");

    if width == 0 || height == 0 {
        return Extraction::Missing(Miss::NoContour);
    }

    let mask = binarize(image, options.polarity);
    let contours = external_contours(&mask);

    let Some((contour, area)) = largest_contour(&contours) else {
        debug!("No contours found");
        return Extraction::Missing(Miss::NoContour);
    };

    if area < options.min_area {
        debug!(area, min_area = options.min_area, "Largest contour too small");
        return Extraction::Missing(Miss::TooSmall { area });
    }

    let Some(bounds) = bounding_region(&contour.points) else {
        return Extraction::Missing(Miss::NoContour);
    };
    let crop = bounds.padded(options.padding, width, height);
    if crop.is_empty() {
        return Extraction::Missing(Miss::NoContour);
    }
    debug!(?bounds, ?crop, area, "Selected character region");

    let cropped = image.crop_imm(crop.x, crop.y, crop.width, crop.height);
    let thumbnail = resize_to_square(&cropped, options.output_size.max(1), options.filter);

    Extraction::Found(Thumbnail {
        image: thumbnail,
        crop,
        area,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    /// White canvas with black rectangles drawn at the given positions.
    fn canvas(width: u32, height: u32, rects: &[(u32, u32, u32, u32)]) -> DynamicImage {
        let mut img = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
        for &(x0, y0, w, h) in rects {
            for y in y0..y0 + h {
                for x in x0..x0 + w {
                    img.put_pixel(x, y, Rgb([0, 0, 0]));
                }
            }
        }
        DynamicImage::ImageRgb8(img)
    }

    fn found(result: Extraction) -> Thumbnail {
        match result {
            Extraction::Found(t) => t,
            Extraction::Missing(miss) => panic!("expected thumbnail, got {miss:?}"),
        }
    }

    #[test]
    fn test_single_square_is_framed_with_padding() {
        let img = canvas(200, 200, &[(50, 50, 20, 20)]);
        let thumb = found(extract(&img, &ExtractOptions::default()));

        assert_eq!(thumb.crop, Region::new(45, 45, 30, 30));
        assert_eq!(thumb.image.width(), THUMBNAIL_SIZE);
        assert_eq!(thumb.image.height(), THUMBNAIL_SIZE);
        assert_eq!(thumb.area, 361.0);
    }

    #[test]
    fn test_thumbnail_centre_is_ink_and_corner_is_paper() {
        let img = canvas(200, 200, &[(50, 50, 20, 20)]);
        let thumb = found(extract(&img, &ExtractOptions::default()));
        let gray = thumb.image.to_luma8();

        assert!(gray.get_pixel(50, 50).0[0] < 64);
        assert!(gray.get_pixel(2, 2).0[0] > 192);
    }

    #[test]
    fn test_blank_image_is_not_found() {
        let img = canvas(50, 50, &[]);
        assert_eq!(
            extract(&img, &ExtractOptions::default()),
            Extraction::Missing(Miss::NoContour)
        );
    }

    #[test]
    fn test_zero_sized_image_is_not_found() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        assert_eq!(
            extract(&img, &ExtractOptions::default()),
            Extraction::Missing(Miss::NoContour)
        );
    }

    #[test]
    fn test_small_blob_is_too_small() {
        // A 10px square encloses 9x9 = 81 area units.
        let img = canvas(60, 60, &[(20, 20, 10, 10)]);
        assert_eq!(
            extract(&img, &ExtractOptions::default()),
            Extraction::Missing(Miss::TooSmall { area: 81.0 })
        );
    }

    #[test]
    fn test_area_at_minimum_is_accepted() {
        // An 11px square encloses exactly 100 area units.
        let img = canvas(60, 60, &[(20, 20, 11, 11)]);
        let thumb = found(extract(&img, &ExtractOptions::default()));
        assert_eq!(thumb.area, 100.0);
    }

    #[test]
    fn test_min_area_option_is_honored() {
        let img = canvas(60, 60, &[(20, 20, 10, 10)]);
        let options = ExtractOptions::new().with_min_area(50.0);
        assert!(matches!(extract(&img, &options), Extraction::Found(_)));
    }

    #[test]
    fn test_largest_blob_wins() {
        let img = canvas(200, 100, &[(10, 10, 15, 15), (100, 20, 40, 50)]);
        let thumb = found(extract(&img, &ExtractOptions::default()));
        assert_eq!(thumb.crop, Region::new(95, 15, 50, 60));
    }

    #[test]
    fn test_blob_at_left_edge_clamps_origin() {
        let img = canvas(100, 100, &[(0, 40, 20, 20)]);
        let thumb = found(extract(&img, &ExtractOptions::default()));
        assert_eq!(thumb.crop.x, 0);
        assert_eq!(thumb.crop, Region::new(0, 35, 30, 30));
    }

    #[test]
    fn test_blob_in_top_left_corner_is_found() {
        let img = canvas(100, 100, &[(0, 0, 20, 20)]);
        let thumb = found(extract(&img, &ExtractOptions::default()));
        assert_eq!(thumb.crop, Region::new(0, 0, 30, 30));
        assert_eq!(thumb.area, 361.0);
    }

    #[test]
    fn test_character_filling_whole_image() {
        let img = canvas(40, 30, &[(0, 0, 40, 30)]);
        let thumb = found(extract(&img, &ExtractOptions::default()));
        assert_eq!(thumb.crop, Region::new(0, 0, 40, 30));
    }

    #[test]
    fn test_blob_at_bottom_right_clamps_extent() {
        let img = canvas(100, 100, &[(80, 85, 20, 15)]);
        let thumb = found(extract(&img, &ExtractOptions::default()));
        assert_eq!(thumb.crop, Region::new(75, 80, 25, 20));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let img = canvas(120, 90, &[(30, 20, 25, 40), (80, 60, 5, 5)]);
        let options = ExtractOptions::default();
        let first = found(extract(&img, &options));
        let second = found(extract(&img, &options));
        assert_eq!(first.image.as_bytes(), second.image.as_bytes());
        assert_eq!(first, second);
    }

    #[test]
    fn test_output_is_square_for_wide_crop() {
        let img = canvas(300, 60, &[(20, 20, 200, 12)]);
        let thumb = found(extract(&img, &ExtractOptions::default()));
        assert_eq!((thumb.image.width(), thumb.image.height()), (100, 100));
    }

    #[test]
    fn test_grayscale_source_is_supported() {
        let mut gray = GrayImage::from_pixel(64, 64, Luma([230]));
        for y in 10..40 {
            for x in 20..30 {
                gray.put_pixel(x, y, Luma([20]));
            }
        }
        let img = DynamicImage::ImageLuma8(gray);
        let thumb = found(extract(&img, &ExtractOptions::default()));
        assert_eq!(thumb.crop, Region::new(15, 5, 20, 40));
    }

    #[test]
    fn test_auto_polarity_finds_light_strokes() {
        let mut img = RgbImage::from_pixel(80, 80, Rgb([0, 0, 0]));
        for y in 30..50 {
            for x in 30..50 {
                img.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
        let img = DynamicImage::ImageRgb8(img);
        let options = ExtractOptions::new().with_polarity(Polarity::Auto);
        let thumb = found(extract(&img, &options));
        assert_eq!(thumb.crop, Region::new(25, 25, 30, 30));
    }

    #[test]
    fn test_validate_rejects_bad_options() {
        assert!(ExtractOptions::default().validate().is_ok());
        assert!(matches!(
            ExtractOptions::new().with_output_size(0).validate(),
            Err(ExtractError::InvalidOutputSize)
        ));
        assert!(matches!(
            ExtractOptions::new().with_min_area(-1.0).validate(),
            Err(ExtractError::InvalidMinArea(_))
        ));
        assert!(ExtractOptions::new().with_min_area(f64::NAN).validate().is_err());
    }
}
