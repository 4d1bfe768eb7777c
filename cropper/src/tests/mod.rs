
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{DynamicImage, Rgb, RgbImage};
use thumb_store::DirStorage;

use crate::app::AppState;
use crate::config::AppConfig;
use crate::notice::RecordingNotifier;

/// White canvas with one black square.
fn glyph_image(width: u32, height: u32, square: Option<(u32, u32, u32)>) -> DynamicImage {
    let mut img = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
    if let Some((x0, y0, side)) = square {
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                img.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }
    }
    DynamicImage::ImageRgb8(img)
}

/// Save `image` as PNG under `dir` and return its path.
fn save_png(dir: &Path, name: &str, image: &DynamicImage) -> PathBuf {
    let path = dir.join(name);
    image.save(&path).expect("Failed to write test image");
    path
}

/// State writing into `output_dir` on disk and recording notices.
fn disk_state(output_dir: &Path) -> (AppState, RecordingNotifier) {
    let config = AppConfig {
        output_dir: output_dir.to_path_buf(),
        ..AppConfig::default()
    };
    let recorder = RecordingNotifier::new();
    let state = AppState::new(
        config,
        Arc::new(DirStorage::new(output_dir)),
        Arc::new(recorder.clone()),
    );
    (state, recorder)
}
