//! Point preparation before fitting.
//!
//! - IQR outlier rejection (`outlier`)
//! - step segmentation along x (`steps`)
//! - per-specimen geometric corrections (`transform`)

pub mod outlier;
pub mod steps;
pub mod transform;

pub use outlier::*;
pub use steps::*;
pub use transform::*;
