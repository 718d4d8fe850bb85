//! Jelly route planning for runner-game screenshots
//!
//! Finds the character and every collectible item by template matching on
//! a screenshot normalised to the canonical resolution, then walks a
//! greedy nearest-item route that only ever moves rightward.

pub mod config;
pub mod detector;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod router;
pub mod screenshot;
pub mod template;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export main types and functions
pub use config::{MatchConfig, PathfinderConfig, RenderConfig};
pub use detector::{CharacterMatch, Detector};
pub use error::{PathfinderError, PathfinderResult};
pub use pipeline::{Pathfinder, PathfinderReport};
pub use render::render_path;
pub use router::{RouteOutcome, route};
pub use screenshot::{load_screenshot, normalize_screenshot, to_luma_bt601};
pub use template::{TemplateImage, load_character_templates, load_item_templates};
pub use types::{LabeledMatchSet, Path, PathStep, Position, Rect, candidate_count};
