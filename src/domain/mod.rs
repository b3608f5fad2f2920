//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - measured points, sections and segmented steps (`Point`, `Step`)
//! - the fitted model tagged union and its coefficient layouts (`FitModel`, `TermLayout`)
//! - rebuild domains (`GeometrySpec`) and run configuration (`PipelineConfig`)

pub mod types;

pub use types::*;
