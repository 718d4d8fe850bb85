//! Path overlay drawing

use super::config::RenderConfig;
use super::types::{Path, Position};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

/// Draw the path onto a copy of `screenshot`.
///
/// One segment runs from `start` to the first step, then one between each
/// pair of consecutive steps. The input image is left untouched.
pub fn render_path(screenshot: &RgbImage, start: Position, path: &Path, config: &RenderConfig) -> RgbImage {
    let mut canvas = screenshot.clone();
    if config.thickness == 0 {
        return canvas;
    }

    let color = Rgb(config.color);
    for segment in path.waypoints(start).windows(2) {
        draw_thick_segment(&mut canvas, segment[0], segment[1], config.thickness, color);
    }
    canvas
}

/// Stroke a segment `thickness` pixels wide by stamping offset copies
fn draw_thick_segment(canvas: &mut RgbImage, from: Position, to: Position, thickness: u32, color: Rgb<u8>) {
    let thickness = thickness as i32;
    let low = -(thickness - 1) / 2;
    let high = thickness / 2;

    for dy in low..=high {
        for dx in low..=high {
            draw_line_segment_mut(
                canvas,
                ((from.x + dx) as f32, (from.y + dy) as f32),
                ((to.x + dx) as f32, (to.y + dy) as f32),
                color,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathfinder::types::{PathStep, Rect};

    const RED: Rgb<u8> = Rgb([255, 0, 0]);

    #[test]
    fn test_segments_follow_waypoints() {
        let screenshot = RgbImage::new(100, 60);
        let path = Path::from(vec![
            PathStep::new("jelly", Rect::new(50, 10, 5, 5)),
            PathStep::new("jelly", Rect::new(50, 50, 5, 5)),
        ]);

        let canvas = render_path(&screenshot, Position::new(10, 10), &path, &RenderConfig::default());

        // start -> first step is horizontal along y = 10
        assert_eq!(*canvas.get_pixel(30, 10), RED);
        assert_eq!(*canvas.get_pixel(30, 11), RED);
        // first -> second step is vertical along x = 50
        assert_eq!(*canvas.get_pixel(50, 30), RED);
        assert_eq!(*canvas.get_pixel(49, 30), RED);
        // off the path
        assert_eq!(*canvas.get_pixel(80, 40), Rgb([0, 0, 0]));
        // source image is not drawn on
        assert_eq!(*screenshot.get_pixel(30, 10), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_empty_path_draws_nothing() {
        let screenshot = RgbImage::from_pixel(20, 20, Rgb([9, 9, 9]));
        let canvas = render_path(&screenshot, Position::new(5, 5), &Path::new(), &RenderConfig::default());
        assert_eq!(canvas, screenshot);
    }

    #[test]
    fn test_zero_thickness_disables_drawing() {
        let screenshot = RgbImage::new(20, 20);
        let path = Path::from(vec![PathStep::new("jelly", Rect::new(15, 5, 2, 2))]);
        let config = RenderConfig {
            thickness: 0,
            ..RenderConfig::default()
        };
        assert_eq!(render_path(&screenshot, Position::new(0, 5), &path, &config), screenshot);
    }
}
