//! Planar grids over specimen domains and model reconstruction on them.
//!
//! - grid generation over rectangles and T-shapes (`grid`)
//! - evaluating a fitted model on a grid (`rebuild`)

pub mod grid;
pub mod rebuild;

pub use grid::*;
pub use rebuild::*;
