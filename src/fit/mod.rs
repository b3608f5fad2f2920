//! Surface/curve fitting orchestration.
//!
//! Responsibilities:
//!
//! - solve one regression per (basis, degree) (`fitter`)
//! - sweep candidate degrees in parallel and pick the lowest in-sample RMSE (`selection`)

pub mod fitter;
pub mod selection;

pub use fitter::*;
pub use selection::*;
