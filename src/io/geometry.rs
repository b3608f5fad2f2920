//! Geometry dimension files.
//!
//! A geometry file is the raw JSON dimension dictionary, e.g.
//! `{"width": 40, "height": 20}` or the six T-shape keys.

use std::fs::File;
use std::path::Path;

use crate::domain::GeometrySpec;
use crate::error::AppError;

pub fn load_geometry(path: &Path) -> Result<GeometrySpec, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open geometry '{}': {e}", path.display())))?;
    let spec: GeometrySpec = serde_json::from_reader(file)
        .map_err(|e| AppError::io(format!("Invalid geometry JSON '{}': {e}", path.display())))?;
    spec.validate()?;
    Ok(spec)
}
