//! Template matching implementation
//!
//! Correlation scoring over every placement of a grayscale template,
//! with window statistics taken from integral images.
use super::types::{Match, MatchMethod};
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::definitions::Image;
use imageproc::integral_image::{integral_image, integral_squared_image};
use imageproc::template_matching::{MatchTemplateMethod, match_template};
use rayon::prelude::*;

/// Template matcher for finding every placement of a template in an image
#[derive(Clone, Copy, Debug, Default)]
pub struct TemplateMatcher {
    method: MatchMethod,
}

impl TemplateMatcher {
    /// Create a matcher using the given scoring method
    pub fn new(method: MatchMethod) -> Self {
        Self { method }
    }

    /// Get the scoring method
    pub fn method(&self) -> MatchMethod {
        self.method
    }

    /// Score every placement of `template` inside `image`.
    ///
    /// The score map is `(W - w + 1) x (H - h + 1)`; pixel `(x, y)` holds the
    /// score of the template with its top-left corner at `(x, y)`.
    /// Returns `None` when the template is empty or larger than the image.
    pub fn score_map(&self, image: &GrayImage, template: &GrayImage) -> Option<Image<Luma<f32>>> {
        if template.width() == 0
            || template.height() == 0
            || template.width() > image.width()
            || template.height() > image.height()
        {
            return None;
        }

        let scores = match self.method {
            MatchMethod::CorrelationCoefficientNormalized => {
                correlation_coefficient_normed(image, template)
            }
            MatchMethod::CrossCorrelationNormalized => match_template(
                image,
                template,
                MatchTemplateMethod::CrossCorrelationNormalized,
            ),
        };
        Some(scores)
    }

    /// Find all placements scoring at or above `threshold`.
    ///
    /// # Arguments
    /// * `image` - The image to search in (grayscale)
    /// * `template` - The template to look for (grayscale)
    /// * `threshold` - Minimum score for a placement to be reported
    ///
    /// # Returns
    /// Vec of matches in row-major scan order (top to bottom, then left to
    /// right). Overlapping placements are all reported.
    pub fn find_matches(&self, image: &GrayImage, template: &GrayImage, threshold: f32) -> Vec<Match> {
        let Some(scores) = self.score_map(image, template) else {
            log::debug!(
                "⚠️ Template {}x{} does not fit in image {}x{}",
                template.width(),
                template.height(),
                image.width(),
                image.height()
            );
            return Vec::new();
        };

        scores
            .enumerate_pixels()
            .filter(|(_, _, pixel)| pixel[0] >= threshold)
            .map(|(x, y, pixel)| Match {
                x,
                y,
                score: pixel[0],
            })
            .collect()
    }
}

/// Zero-mean normalized cross-correlation.
///
/// score = Σ I·T' / (‖T'‖ · ‖I - mean(I)‖) with T' the mean-centred template.
/// Placements where either side has zero variance score 0.
fn correlation_coefficient_normed(image: &GrayImage, template: &GrayImage) -> Image<Luma<f32>> {
    let (tw, th) = template.dimensions();
    let out_w = image.width() - tw + 1;
    let out_h = image.height() - th + 1;
    let n = u128::from(tw) * u128::from(th);

    let t_mean = template.pixels().map(|p| f64::from(p[0])).sum::<f64>() / n as f64;
    let centered: Vec<f64> = template.pixels().map(|p| f64::from(p[0]) - t_mean).collect();
    let t_norm = centered.iter().map(|v| v * v).sum::<f64>().sqrt();

    let sums = integral_image::<_, u64>(image);
    let squares = integral_squared_image::<_, u64>(image);
    let pixels = image.as_raw();
    let stride = image.width() as usize;

    let mut out: Image<Luma<f32>> = ImageBuffer::new(out_w, out_h);
    let buffer: &mut [f32] = &mut out;
    buffer
        .par_chunks_mut(out_w as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as u32;
            for (x, score) in row.iter_mut().enumerate() {
                let x = x as u32;
                let sum = u128::from(window_sum(&sums, x, y, tw, th));
                let sq = u128::from(window_sum(&squares, x, y, tw, th));
                // n·Σx² - (Σx)² is exact in integers, so flat windows hit zero
                let spread = (n * sq).saturating_sub(sum * sum) as f64 / n as f64;
                let denom = t_norm * spread.sqrt();
                if denom <= f64::EPSILON {
                    *score = 0.0;
                    continue;
                }

                let mut cross = 0.0;
                for ty in 0..th as usize {
                    let image_row = (y as usize + ty) * stride + x as usize;
                    let template_row = ty * tw as usize;
                    for tx in 0..tw as usize {
                        cross += f64::from(pixels[image_row + tx]) * centered[template_row + tx];
                    }
                }
                *score = (cross / denom).clamp(-1.0, 1.0) as f32;
            }
        });

    out
}

/// Sum of the `w x h` window at `(x, y)` from a zero-padded integral image
fn window_sum(integral: &Image<Luma<u64>>, x: u32, y: u32, w: u32, h: u32) -> u64 {
    let at = |px: u32, py: u32| integral.get_pixel(px, py)[0];
    at(x + w, y + h) + at(x, y) - at(x + w, y) - at(x, y + h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::imageops::crop_imm;

    /// Deterministic textured image so every window has variance
    fn textured(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            Luma([((x * 37 + y * 91 + (x * y) % 23) % 251) as u8])
        })
    }

    #[test]
    fn test_perfect_match_scores_one() {
        let image = textured(40, 30);
        let template = crop_imm(&image, 12, 7, 8, 6).to_image();
        let matcher = TemplateMatcher::new(MatchMethod::CorrelationCoefficientNormalized);

        let scores = matcher.score_map(&image, &template).unwrap();
        assert_eq!(scores.dimensions(), (33, 25));
        assert!(scores.get_pixel(12, 7)[0] > 0.999, "exact placement should score ~1.0");
    }

    #[test]
    fn test_brightness_and_contrast_invariance() {
        let image = textured(40, 30);
        let template = crop_imm(&image, 5, 5, 6, 6).to_image();
        // Halve contrast and add an offset: a linear transform of the same patch
        let shifted = GrayImage::from_fn(6, 6, |x, y| Luma([template.get_pixel(x, y)[0] / 2 + 40]));
        let matcher = TemplateMatcher::default();

        let scores = matcher.score_map(&image, &shifted).unwrap();
        assert!(scores.get_pixel(5, 5)[0] > 0.99);
    }

    #[test]
    fn test_flat_template_never_matches() {
        let image = textured(20, 20);
        let flat = GrayImage::from_pixel(4, 4, Luma([128]));
        let matcher = TemplateMatcher::default();

        assert!(matcher.find_matches(&image, &flat, 0.1).is_empty());
    }

    #[test]
    fn test_oversized_template_returns_none() {
        let image = textured(10, 10);
        let template = textured(11, 4);
        let matcher = TemplateMatcher::default();

        assert!(matcher.score_map(&image, &template).is_none());
        assert!(matcher.find_matches(&image, &template, -1.0).is_empty());
    }

    #[test]
    fn test_matches_are_row_major() {
        let image = textured(30, 30);
        let template = crop_imm(&image, 3, 3, 5, 5).to_image();
        let matcher = TemplateMatcher::default();

        let matches = matcher.find_matches(&image, &template, -1.0);
        assert_eq!(matches.len(), 26 * 26);
        assert_eq!((matches[0].x, matches[0].y), (0, 0));
        assert_eq!((matches[1].x, matches[1].y), (1, 0));
        assert_eq!((matches[26].x, matches[26].y), (0, 1));
    }

    #[test]
    fn test_cross_correlation_method_delegates() {
        let image = textured(24, 24);
        let template = crop_imm(&image, 4, 9, 6, 6).to_image();
        let matcher = TemplateMatcher::new(MatchMethod::CrossCorrelationNormalized);

        let matches = matcher.find_matches(&image, &template, 0.999);
        assert!(matches.iter().any(|m| m.x == 4 && m.y == 9));
    }

    #[test]
    fn test_match_describe() {
        let m = Match {
            x: 3,
            y: 4,
            score: 0.875,
        };
        assert_eq!(m.describe("jelly"), "jelly at (3,4) - 87%");
    }
}
