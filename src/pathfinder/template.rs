//! Template loading for item and character sprites

use super::error::{PathfinderError, PathfinderResult};
use super::screenshot::to_luma_bt601;
use image::GrayImage;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A labelled template, converted to luminance once at load time
#[derive(Debug, Clone)]
pub struct TemplateImage {
    pub label: String,
    pub path: PathBuf,
    pub gray: GrayImage,
}

impl TemplateImage {
    /// Load a template from disk as BT.601 luminance. Any alpha channel is
    /// ignored.
    pub fn load(label: impl Into<String>, path: &Path) -> PathfinderResult<Self> {
        let image = image::open(path).map_err(|source| PathfinderError::TemplateLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let gray = to_luma_bt601(&image);
        if gray.width() == 0 || gray.height() == 0 {
            return Err(PathfinderError::EmptyTemplate {
                path: path.to_path_buf(),
            });
        }

        Ok(Self {
            label: label.into(),
            path: path.to_path_buf(),
            gray,
        })
    }

    /// Wrap an in-memory image
    pub fn from_gray(label: impl Into<String>, gray: GrayImage) -> Self {
        let label = label.into();
        Self {
            path: PathBuf::from(format!("<memory:{label}>")),
            label,
            gray,
        }
    }

    pub fn width(&self) -> u32 {
        self.gray.width()
    }

    pub fn height(&self) -> u32 {
        self.gray.height()
    }
}

/// Load every item template, skipping files that fail to load.
///
/// Returned templates are ordered by label. Only a fatal error aborts.
pub fn load_item_templates(items: &BTreeMap<String, PathBuf>) -> PathfinderResult<Vec<TemplateImage>> {
    let mut templates = Vec::with_capacity(items.len());
    for (label, path) in items {
        match TemplateImage::load(label.as_str(), path) {
            Ok(template) => {
                log::debug!(
                    "📦 Loaded item template '{}' {}x{} from {:?}",
                    label,
                    template.width(),
                    template.height(),
                    path
                );
                templates.push(template);
            }
            Err(e) if !e.is_fatal() => log::warn!("⚠️ Skipping item template '{}': {}", label, e),
            Err(e) => return Err(e),
        }
    }
    Ok(templates)
}

/// Load character pose templates in priority order, skipping failures.
///
/// Each pose is labelled by its file stem.
pub fn load_character_templates(paths: &[PathBuf]) -> PathfinderResult<Vec<TemplateImage>> {
    let mut templates = Vec::with_capacity(paths.len());
    for path in paths {
        let label = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string();
        match TemplateImage::load(label, path) {
            Ok(template) => templates.push(template),
            Err(e) if !e.is_fatal() => log::warn!("⚠️ Skipping character template: {}", e),
            Err(e) => return Err(e),
        }
    }
    Ok(templates)
}
