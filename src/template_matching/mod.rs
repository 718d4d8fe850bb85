/// Template matching module for locating sprites in screenshots
///
/// This module provides the raw scoring engine:
/// - Zero-mean normalized cross-correlation backed by integral images
/// - imageproc's normalized cross-correlation as an alternative scorer
/// - Exhaustive thresholding with no non-maximum suppression
pub mod matcher;
pub mod types;

pub use matcher::TemplateMatcher;
pub use types::{Match, MatchMethod};
