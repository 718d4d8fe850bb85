//! Item and character detection over a normalised screenshot

use super::config::MatchConfig;
use super::error::{PathfinderError, PathfinderResult};
use super::template::TemplateImage;
use super::types::{LabeledMatchSet, Position, Rect};
use crate::template_matching::TemplateMatcher;
use image::GrayImage;
use rayon::prelude::*;
use serde::Serialize;

/// The pose that located the character and every placement it matched
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CharacterMatch {
    /// File stem of the matching pose template
    pub pose: String,
    /// Index of that pose in the priority list
    pub pose_index: usize,
    /// All placements of that pose, in scan order (never empty)
    pub rects: Vec<Rect>,
}

impl CharacterMatch {
    /// Routing starts at the top-left corner of the first placement
    pub fn start(&self) -> Position {
        self.rects
            .first()
            .map(Rect::top_left)
            .unwrap_or_default()
    }
}

/// Thresholded template detector
pub struct Detector {
    matcher: TemplateMatcher,
    threshold: f32,
    parallel_labels: bool,
}

impl Detector {
    pub fn new(config: &MatchConfig) -> Self {
        let matcher = TemplateMatcher::new(config.method);
        log::debug!(
            "🔧 Detector method={} threshold={:.3}",
            matcher.method(),
            config.threshold
        );
        Self {
            matcher,
            threshold: config.threshold,
            parallel_labels: config.parallel_labels,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Every placement of every template scoring at or above the threshold.
    ///
    /// Rectangles take the template's size. Overlapping placements are all
    /// kept; results for successive templates are concatenated.
    pub fn detect<'a, I>(&self, screenshot: &GrayImage, templates: I) -> Vec<Rect>
    where
        I: IntoIterator<Item = &'a GrayImage>,
    {
        templates
            .into_iter()
            .flat_map(|template| self.detect_labeled(screenshot, "template", template))
            .collect()
    }

    /// Placements of a single template, traced under `label`
    fn detect_labeled(&self, screenshot: &GrayImage, label: &str, template: &GrayImage) -> Vec<Rect> {
        let (width, height) = template.dimensions();
        self.matcher
            .find_matches(screenshot, template, self.threshold)
            .into_iter()
            .map(|m| {
                log::trace!("  {}", m.describe(label));
                Rect::new(m.x as i32, m.y as i32, width, height)
            })
            .collect()
    }

    /// Detect each item template on its own and key the results by label.
    ///
    /// Labels with no match map to an empty list. Templates sharing a label
    /// are concatenated in input order.
    pub fn detect_all(&self, screenshot: &GrayImage, items: &[TemplateImage]) -> LabeledMatchSet {
        let detect_one = |item: &TemplateImage| {
            let rects = self.detect_labeled(screenshot, &item.label, &item.gray);
            log::debug!("🔍 '{}': {} matches", item.label, rects.len());
            (item.label.clone(), rects)
        };

        let per_label: Vec<(String, Vec<Rect>)> = if self.parallel_labels {
            items.par_iter().map(detect_one).collect()
        } else {
            items.iter().map(detect_one).collect()
        };

        let mut set = LabeledMatchSet::new();
        for (label, rects) in per_label {
            set.entry(label).or_default().extend(rects);
        }
        set
    }

    /// Try each pose in priority order and return the first that matches.
    ///
    /// Matches from different poses are never merged.
    pub fn locate_character(
        &self,
        screenshot: &GrayImage,
        poses: &[TemplateImage],
    ) -> PathfinderResult<CharacterMatch> {
        if poses.is_empty() {
            return Err(PathfinderError::NoCharacterTemplates);
        }

        for (pose_index, pose) in poses.iter().enumerate() {
            let rects = self.detect_labeled(screenshot, &pose.label, &pose.gray);
            if rects.is_empty() {
                log::debug!("🍪 Pose '{}' not found", pose.label);
                continue;
            }

            log::info!(
                "🍪 Character located with pose '{}' at {} ({} placements)",
                pose.label,
                rects[0].top_left(),
                rects.len()
            );
            return Ok(CharacterMatch {
                pose: pose.label.clone(),
                pose_index,
                rects,
            });
        }

        Err(PathfinderError::CharacterNotFound { tried: poses.len() })
    }
}
