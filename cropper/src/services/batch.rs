//! Batch driver: runs the extractor over a list of input images and writes
//! each thumbnail into the output location.
//!
//! A missing character or an unreadable input skips that file and the batch
//! continues. A failed write to the output location aborts the rest of the
//! batch, since every later write would hit the same storage.

use std::path::{Path, PathBuf};

use glyph_extract::{ExtractOptions, Extraction, Miss, Thumbnail, extract};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageReader};
use serde::Serialize;
use thumb_store::StoreError;
use tracing::{debug, info, warn};

use crate::app::AppState;
use crate::notice::Notice;

/// Why a file produced no thumbnail.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    NoCharacter,
    TooSmall { area: f64 },
    Unreadable { detail: String },
}

/// A file that produced no thumbnail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skipped {
    pub file: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Summary of one batch run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    /// Output names written, in input order.
    pub written: Vec<String>,
    pub skipped: Vec<Skipped>,
}

/// Result of processing one decoded image.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageOutcome {
    Written(String),
    Skipped(Skipped),
}

/// Batch error type.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("no input files were selected")]
    NoInput,

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("failed to encode thumbnail for {file}: {source}")]
    Encode {
        file: String,
        #[source]
        source: image::ImageError,
    },
}

/// Runs extraction over input files and persists the thumbnails.
pub struct BatchDriver<'a> {
    state: &'a AppState,
    options: ExtractOptions,
}

impl<'a> BatchDriver<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            state,
            options: state.config().extract_options(),
        }
    }

    /// Process every path in order.
    ///
    /// An empty list is reported as [`BatchError::NoInput`] without touching
    /// the output location.
    pub fn process_files(&self, paths: &[PathBuf]) -> Result<BatchReport, BatchError> {
        if paths.is_empty() {
            self.state.notify(Notice::NoFileSelected);
            return Err(BatchError::NoInput);
        }

        self.state.storage().ensure_location()?;
        info!(
            count = paths.len(),
            output = %self.state.storage().describe(),
            "Processing images"
        );

        let mut report = BatchReport::default();
        for path in paths {
            let outcome = match load_source(path) {
                Ok((name, image)) => self.process_image(&name, &image)?,
                Err(skipped) => {
                    self.notify_skip(&skipped);
                    ImageOutcome::Skipped(skipped)
                }
            };
            match outcome {
                ImageOutcome::Written(name) => report.written.push(name),
                ImageOutcome::Skipped(skipped) => report.skipped.push(skipped),
            }
        }

        info!(
            written = report.written.len(),
            skipped = report.skipped.len(),
            "Batch complete"
        );
        self.state.notify(Notice::BatchSucceeded {
            written: report.written.len(),
            skipped: report.skipped.len(),
        });
        Ok(report)
    }

    /// Extract one decoded image and write its thumbnail under `name`.
    ///
    /// The output location must already exist.
    pub fn process_image(
        &self,
        name: &str,
        image: &DynamicImage,
    ) -> Result<ImageOutcome, BatchError> {
        let thumbnail = match extract(image, &self.options) {
            Extraction::Found(thumbnail) => thumbnail,
            Extraction::Missing(miss) => {
                let reason = match miss {
                    Miss::NoContour => SkipReason::NoCharacter,
                    Miss::TooSmall { area } => SkipReason::TooSmall { area },
                };
                let skipped = Skipped {
                    file: name.to_string(),
                    reason,
                };
                self.notify_skip(&skipped);
                return Ok(ImageOutcome::Skipped(skipped));
            }
        };

        let bytes = encode_jpeg(&thumbnail, self.state.config().jpeg_quality).map_err(|source| {
            BatchError::Encode {
                file: name.to_string(),
                source,
            }
        })?;
        self.state.storage().write(name, &bytes)?;
        debug!(name, crop = ?thumbnail.crop, area = thumbnail.area, "Saved thumbnail");

        Ok(ImageOutcome::Written(name.to_string()))
    }

    fn notify_skip(&self, skipped: &Skipped) {
        let file = skipped.file.clone();
        let notice = match &skipped.reason {
            SkipReason::NoCharacter => Notice::NoCharacterFound { file },
            SkipReason::TooSmall { area } => Notice::ContourTooSmall { file, area: *area },
            SkipReason::Unreadable { detail } => Notice::Unreadable {
                file,
                reason: detail.clone(),
            },
        };
        self.state.notify(notice);
    }
}

/// Open and decode one input, returning its base file name with the image.
fn load_source(path: &Path) -> Result<(String, DynamicImage), Skipped> {
    let display = path.display().to_string();
    let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
        return Err(Skipped {
            file: display,
            reason: SkipReason::Unreadable {
                detail: "path has no file name".to_string(),
            },
        });
    };

    let unreadable = |detail: String| {
        warn!(path = %path.display(), "Skipping unreadable image: {detail}");
        Skipped {
            file: name.clone(),
            reason: SkipReason::Unreadable { detail },
        }
    };

    let image = ImageReader::open(path)
        .map_err(|e| unreadable(e.to_string()))?
        .with_guessed_format()
        .map_err(|e| unreadable(e.to_string()))?
        .decode()
        .map_err(|e| unreadable(e.to_string()))?;

    Ok((name, image))
}

/// Encode a thumbnail as baseline RGB JPEG.
pub fn encode_jpeg(thumbnail: &Thumbnail, quality: u8) -> Result<Vec<u8>, image::ImageError> {
    let rgb = DynamicImage::ImageRgb8(thumbnail.image.to_rgb8());
    let mut bytes = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, quality))?;
    Ok(bytes)
}
