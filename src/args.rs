use clap::Parser;
use jelly_pathfinder::pathfinder::{PathfinderConfig, PathfinderResult};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "jelly-pathfinder",
    about = "Locate the runner and jellies in a screenshot and plot a rightward collection route",
    version
)]
pub struct Args {
    /// JSON manifest naming the screenshot and template files
    #[arg(short = 'm', long = "manifest")]
    pub manifest: Option<PathBuf>,

    /// Screenshot to analyse (overrides the manifest)
    #[arg(short = 's', long = "screenshot")]
    pub screenshot: Option<PathBuf>,

    /// Match threshold in [-1, 1] (default 0.633)
    #[arg(short = 't', long = "threshold", allow_negative_numbers = true)]
    pub threshold: Option<f32>,

    /// Where to write the screenshot with the route drawn on it
    #[arg(short = 'o', long = "output", default_value = "pathfinder-result.png")]
    pub output: PathBuf,

    /// Print the full report as JSON instead of a text listing
    #[arg(long = "json")]
    pub json: bool,

    /// Enable debug output
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Args {
    /// Defaults, then the manifest, then command-line overrides
    pub fn build_config(&self) -> PathfinderResult<PathfinderConfig> {
        let mut config = match &self.manifest {
            Some(path) => PathfinderConfig::from_manifest(path)?,
            None => PathfinderConfig::default(),
        };

        if let Some(screenshot) = &self.screenshot {
            config.screenshot = screenshot.clone();
        }
        if let Some(threshold) = self.threshold {
            config.matching.threshold = threshold;
        }
        config.matching.validate()?;
        Ok(config)
    }
}
