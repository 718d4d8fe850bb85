pub mod pathfinder;
pub mod template_matching;

pub use pathfinder::{
    Pathfinder, PathfinderConfig, PathfinderError, PathfinderReport, PathfinderResult,
};
