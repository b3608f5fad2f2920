//! Model evaluation for the three regression bases.
//!
//! Models are implemented as small, pure functions so that fitting code can
//! stay generic over the basis.

pub mod model;

pub use model::*;
