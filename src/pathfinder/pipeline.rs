//! End-to-end run: normalise, locate the character, detect items, route

use super::config::PathfinderConfig;
use super::detector::{CharacterMatch, Detector};
use super::error::{PathfinderError, PathfinderResult};
use super::render::render_path;
use super::router::route;
use super::screenshot::{load_screenshot, normalize_screenshot, to_luma_bt601};
use super::template::{TemplateImage, load_character_templates, load_item_templates};
use super::types::{LabeledMatchSet, Path, Position, candidate_count};
use image::{DynamicImage, RgbImage};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PathfinderReport {
    /// Routing origin: top-left of the character's first placement
    pub start: Position,
    pub character: CharacterMatch,
    /// Item detections as found; routing does not consume them
    pub matches: LabeledMatchSet,
    pub path: Path,
    /// Detected items the path never reached
    pub unreachable: usize,
    pub processing_time_ms: u64,
}

/// Main pathfinder holding the configuration and loaded templates
pub struct Pathfinder {
    config: PathfinderConfig,
    detector: Detector,
    items: Vec<TemplateImage>,
    characters: Vec<TemplateImage>,
}

impl Pathfinder {
    pub fn new(config: PathfinderConfig) -> PathfinderResult<Self> {
        config.matching.validate()?;
        Ok(Self {
            detector: Detector::new(&config.matching),
            config,
            items: Vec::new(),
            characters: Vec::new(),
        })
    }

    /// Build from already-loaded templates
    pub fn with_templates(
        config: PathfinderConfig,
        items: Vec<TemplateImage>,
        characters: Vec<TemplateImage>,
    ) -> PathfinderResult<Self> {
        let mut pathfinder = Self::new(config)?;
        pathfinder.items = items;
        pathfinder.characters = characters;
        Ok(pathfinder)
    }

    /// Load item and character templates named in the configuration.
    ///
    /// Returns `(items, characters)` loaded. Unloadable item templates are
    /// skipped; having no usable character template is fatal.
    pub fn load_templates(&mut self) -> PathfinderResult<(usize, usize)> {
        self.items = load_item_templates(&self.config.items)?;
        self.characters = load_character_templates(&self.config.characters)?;
        log::info!(
            "📦 Loaded {}/{} item templates, {}/{} character poses",
            self.items.len(),
            self.config.items.len(),
            self.characters.len(),
            self.config.characters.len()
        );

        if self.characters.is_empty() {
            return Err(PathfinderError::NoCharacterTemplates);
        }
        Ok((self.items.len(), self.characters.len()))
    }

    pub fn config(&self) -> &PathfinderConfig {
        &self.config
    }

    /// Load the configured screenshot, normalised to the canonical size
    pub fn load_screenshot(&self) -> PathfinderResult<DynamicImage> {
        load_screenshot(&self.config.screenshot, &self.config.matching)
    }

    /// Analyse a screenshot. It is normalised first if needed.
    pub fn analyze(&self, screenshot: &DynamicImage) -> PathfinderResult<PathfinderReport> {
        let start_time = std::time::Instant::now();

        let normalized = normalize_screenshot(screenshot.clone(), &self.config.matching);
        let gray = to_luma_bt601(&normalized);

        let character = self.detector.locate_character(&gray, &self.characters)?;
        let start = character.start();

        let matches = self.detector.detect_all(&gray, &self.items);
        log::info!(
            "🍬 {} item candidates across {} labels",
            candidate_count(&matches),
            matches.len()
        );

        let outcome = route(start, &matches);
        log::info!(
            "🧭 Path visits {} items, length {:.1}px",
            outcome.path.len(),
            outcome.path.total_length(start)
        );

        Ok(PathfinderReport {
            start,
            character,
            matches,
            path: outcome.path,
            unreachable: outcome.unreachable,
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    /// Draw the report's path over the normalised screenshot
    pub fn render(&self, screenshot: &DynamicImage, report: &PathfinderReport) -> RgbImage {
        let normalized = normalize_screenshot(screenshot.clone(), &self.config.matching);
        render_path(&normalized.to_rgb8(), report.start, &report.path, &self.config.render)
    }
}
