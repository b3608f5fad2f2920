//! `specimen-surfaces` library crate.
//!
//! The binary (`spx`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable from other tools and notebooks
//! - code stays easy to navigate as the project grows
//!
//! Pipeline: IQR cleaning (`prep`) -> step segmentation (`prep`) -> fitting
//! (`fit`, `models`) -> model algebra (`algebra`) -> mesh rebuild (`mesh`).

pub mod algebra;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod mesh;
pub mod models;
pub mod prep;
pub mod report;

pub use algebra::{average, subtract};
pub use domain::{Basis, ErrorMetrics, FitModel, GeometrySpec, GridStep, Point, Step};
pub use error::{AppError, ErrorKind};
pub use fit::{fit, FitOptions};
pub use mesh::rebuild;
pub use models::evaluate;
pub use prep::filter_iqr as filter;
pub use prep::find_steps as segment;
pub use report::compute_residuals as residuals;
