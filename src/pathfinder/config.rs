//! Configuration for detection, rendering and the input file set

use super::error::{PathfinderError, PathfinderResult};
use crate::template_matching::MatchMethod;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Screenshot width the templates were captured at
pub const CANONICAL_WIDTH: u32 = 1480;
/// Screenshot height the templates were captured at
pub const CANONICAL_HEIGHT: u32 = 720;
/// Default similarity threshold
pub const DEFAULT_THRESHOLD: f32 = 0.633;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Minimum score for a placement to count as a match
    pub threshold: f32,
    /// Scoring function
    pub method: MatchMethod,
    /// Screenshots are resized to exactly this size before matching
    pub canonical_width: u32,
    pub canonical_height: u32,
    /// Run item labels concurrently
    pub parallel_labels: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            method: MatchMethod::CorrelationCoefficientNormalized,
            canonical_width: CANONICAL_WIDTH,
            canonical_height: CANONICAL_HEIGHT,
            parallel_labels: true,
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> PathfinderResult<()> {
        if !(-1.0..=1.0).contains(&self.threshold) {
            return Err(PathfinderError::InvalidThreshold {
                value: self.threshold,
            });
        }
        Ok(())
    }
}

/// Overlay line style
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// RGB line colour
    pub color: [u8; 3],
    /// Line thickness in pixels; 0 disables drawing
    pub thickness: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            color: [255, 0, 0],
            thickness: 3,
        }
    }
}

/// Full run configuration: input files plus detection and render settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathfinderConfig {
    /// Screenshot to analyse
    pub screenshot: PathBuf,
    /// Character pose templates, highest priority first
    pub characters: Vec<PathBuf>,
    /// Item label -> template file
    pub items: BTreeMap<String, PathBuf>,
    pub matching: MatchConfig,
    pub render: RenderConfig,
}

impl Default for PathfinderConfig {
    fn default() -> Self {
        let items = [
            ("silvercoin", "silvercoin.png"),
            ("kingbearjelly", "kingbearjelly.webp"),
            ("jelly", "jelly.webp"),
            ("yellowbearjelly", "yellowbearjelly.webp"),
            ("pinkbearjelly", "pinkbearjelly.png"),
        ]
        .into_iter()
        .map(|(label, file)| (label.to_string(), PathBuf::from(file)))
        .collect();

        let characters = std::iter::once("strawberryshortcakecookie.png".to_string())
            .chain((1..=4).map(|i| format!("strawberryshortcakecookie{i}.png")))
            .map(PathBuf::from)
            .collect();

        Self {
            screenshot: PathBuf::from("cookie_run_screenshot.jpg"),
            characters,
            items,
            matching: MatchConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl PathfinderConfig {
    /// Load a JSON manifest. Missing fields take their defaults and relative
    /// paths are resolved against the manifest's directory.
    pub fn from_manifest(path: &Path) -> PathfinderResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| PathfinderError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self =
            serde_json::from_str(&text).map_err(|source| PathfinderError::ManifestParse {
                path: path.to_path_buf(),
                source,
            })?;

        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        config.matching.validate()?;
        Ok(config)
    }

    /// Prefix every relative input path with `base`
    pub fn resolve_relative_to(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.screenshot);
        self.characters.iter_mut().for_each(resolve);
        self.items.values_mut().for_each(resolve);
    }
}
