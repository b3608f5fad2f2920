//! Input/output helpers.
//!
//! - point/curve ingest (`ingest`)
//! - geometry dimension files (`geometry`)
//! - model JSON read/write (`model`)
//! - point cloud CSV export (`export`)

pub mod export;
pub mod geometry;
pub mod ingest;
pub mod model;

pub use export::*;
pub use geometry::*;
pub use ingest::*;
pub use model::*;
