//! Synthetic specimen data for demos and tests.

pub mod sample;

pub use sample::*;
