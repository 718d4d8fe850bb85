//! Template matching data types

use serde::{Deserialize, Serialize};

/// Scoring function applied at every template placement
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// Zero-mean normalized cross-correlation, range [-1, 1].
    /// Unaffected by a linear change of brightness or contrast.
    #[default]
    CorrelationCoefficientNormalized,
    /// imageproc's normalized cross-correlation, range [0, 1]
    CrossCorrelationNormalized,
}

/// A single placement scoring at or above the threshold
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    /// X coordinate of the template's top-left corner in the search image
    pub x: u32,
    /// Y coordinate of the template's top-left corner in the search image
    pub y: u32,
    /// Similarity score for this placement
    pub score: f32,
}

impl std::fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchMethod::CorrelationCoefficientNormalized => write!(f, "ccoeff-normed"),
            MatchMethod::CrossCorrelationNormalized => write!(f, "ccorr-normed"),
        }
    }
}

impl Match {
    /// Format match as string with score percentage
    pub fn describe(&self, label: &str) -> String {
        let score_pct = (self.score * 100.0) as i32;
        format!("{} at ({},{}) - {}%", label, self.x, self.y, score_pct)
    }
}
