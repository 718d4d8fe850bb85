use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for pathfinder operations.
pub type PathfinderResult<T> = Result<T, PathfinderError>;

/// The error type for loading, detection and output.
#[derive(Debug, Error)]
pub enum PathfinderError {
    #[error("Failed to load screenshot {path:?}: {source}")]
    ScreenshotLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to load template {path:?}: {source}")]
    TemplateLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Template {path:?} has no pixels")]
    EmptyTemplate { path: PathBuf },

    #[error("No character templates could be loaded")]
    NoCharacterTemplates,

    #[error("Character not found (tried {tried} pose templates)")]
    CharacterNotFound { tried: usize },

    #[error("Failed to read manifest {path:?}: {source}")]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse manifest {path:?}: {source}")]
    ManifestParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Match threshold {value} is outside [-1.0, 1.0]")]
    InvalidThreshold { value: f32 },

    #[error("Failed to write overlay image {path:?}: {source}")]
    OutputWrite {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to serialize report: {source}")]
    JsonOutput {
        #[from]
        source: serde_json::Error,
    },
}

impl PathfinderError {
    /// Whether this error must abort the run.
    ///
    /// A single item or pose template that fails to load is skipped; every
    /// other failure stops the run before routing.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            PathfinderError::TemplateLoad { .. } | PathfinderError::EmptyTemplate { .. }
        )
    }
}
