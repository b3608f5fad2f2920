//! Mathematical utilities: polynomial/Chebyshev bases, least squares, percentiles.

pub mod basis;
pub mod ols;
pub mod stats;

pub use basis::*;
pub use ols::*;
pub use stats::*;
