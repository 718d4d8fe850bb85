//! Screenshot loading and resolution normalisation

use super::config::MatchConfig;
use super::error::{PathfinderError, PathfinderResult};
use image::{DynamicImage, GrayImage, Luma};
use image::imageops::FilterType;
use std::path::Path;

/// Load a screenshot and normalise it to the canonical resolution
pub fn load_screenshot(path: &Path, config: &MatchConfig) -> PathfinderResult<DynamicImage> {
    let image = image::open(path).map_err(|source| PathfinderError::ScreenshotLoad {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!(
        "🖼️ Loaded screenshot {:?} ({}x{})",
        path,
        image.width(),
        image.height()
    );
    Ok(normalize_screenshot(image, config))
}

/// Resize to exactly the canonical size, ignoring aspect ratio.
///
/// Templates were captured at the canonical size, so every coordinate the
/// detector reports is in that space.
pub fn normalize_screenshot(image: DynamicImage, config: &MatchConfig) -> DynamicImage {
    let (width, height) = (config.canonical_width, config.canonical_height);
    if image.width() == width && image.height() == height {
        return image;
    }

    log::debug!(
        "📐 Resizing screenshot {}x{} -> {}x{}",
        image.width(),
        image.height(),
        width,
        height
    );
    image.resize_exact(width, height, FilterType::Triangle)
}

/// Luminance with BT.601 weights (0.299, 0.587, 0.114).
///
/// Fixed-point with 14 fractional bits and round-half-up, so results agree
/// with OpenCV's `BGR2GRAY`. Alpha is ignored.
pub fn to_luma_bt601(image: &DynamicImage) -> GrayImage {
    let rgb = image.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let luma = (u32::from(r) * 4899 + u32::from(g) * 9617 + u32::from(b) * 1868 + 8192) >> 14;
        Luma([luma as u8])
    })
}
