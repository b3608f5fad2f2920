//! Coefficient-space arithmetic over fitted models.
//!
//! - `subtract`: remove a low-degree trend from a high-degree detail model
//! - `average`: elementwise mean across repeated samples
//! - `detrend`: fit both degrees from the same points and subtract

pub mod ops;

pub use ops::*;
