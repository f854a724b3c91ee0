//! SSP Data Preparation
//! 
//! Stages the inputs of the urban development model chain for one
//! country and one socioeconomic scenario:
//! - Boundary, LAD and SSP files copied into the fixed output layout
//! - Parameter record passed through every downstream model
//! - Catalog metadata with a grid-snapped bounding box

pub mod bbox;
pub mod config;
pub mod error;
pub mod geometry;
pub mod materialize;
pub mod metadata;
pub mod paths;
pub mod pipeline;
pub mod select;
pub mod utils;

// Re-exports for convenience
pub use bbox::{round_down, round_up, BoundingBox, RoundingMode};
pub use config::RunConfig;
pub use error::{DataPrepError, Result};
pub use paths::DataPaths;
pub use pipeline::{run, RunReport};
