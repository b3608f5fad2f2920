//! Read/write model JSON files.
//!
//! A model file is the portable representation of a fit:
//! - the tagged `FitModel` (basis, degree, coefficients, normalization)
//! - provenance (tool, generation time, source id)
//! - optional in-sample error metrics
//!
//! `spx subtract` and `spx average` operate on these files.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{ErrorMetrics, FitModel};
use crate::error::AppError;

pub const TOOL_NAME: &str = "spx";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFile {
    pub tool: String,
    pub generated: DateTime<Utc>,
    /// Where the model came from (input file, specimen id, or an operation).
    pub source: String,
    pub model: FitModel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<ErrorMetrics>,
}

impl ModelFile {
    pub fn new(source: impl Into<String>, model: FitModel, quality: Option<ErrorMetrics>) -> Self {
        Self {
            tool: TOOL_NAME.to_string(),
            generated: Utc::now(),
            source: source.into(),
            model,
            quality,
        }
    }
}

/// Write a model JSON file.
pub fn write_model_json(path: &Path, file: &ModelFile) -> Result<(), AppError> {
    let out = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create model JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(out, file).map_err(|e| AppError::io(format!("Failed to write model JSON: {e}")))
}

/// Read a model JSON file and re-check the model's invariants.
pub fn read_model_json(path: &Path) -> Result<ModelFile, AppError> {
    let f = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open model JSON '{}': {e}", path.display())))?;
    let file: ModelFile = serde_json::from_reader(f)
        .map_err(|e| AppError::io(format!("Invalid model JSON '{}': {e}", path.display())))?;
    file.model.validate()?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainBox;

    #[test]
    fn model_file_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.json");
        let norm = DomainBox {
            x_min: 0.0,
            x_max: 10.0,
            y_min: -1.0,
            y_max: 1.0,
        };
        let model = FitModel::chebyshev_2d(1, vec![0.5, 0.0, 1.0, -0.25], norm).unwrap();
        let file = ModelFile::new("S1", model, None);
        write_model_json(&path, &file).unwrap();
        let back = read_model_json(&path).unwrap();
        assert_eq!(back, file);
        assert_eq!(back.tool, "spx");
    }

    #[test]
    fn wrong_coefficient_count_is_rejected_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        let json = r#"{
            "tool": "spx",
            "generated": "2024-01-01T00:00:00Z",
            "source": "hand",
            "model": {"type": "poly2d_separable", "degree": 2, "coeffs": [1.0, 2.0, 3.0]}
        }"#;
        std::fs::write(&path, json).unwrap();
        let err = read_model_json(&path).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Validation);
    }

    #[test]
    fn garbage_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.json");
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(read_model_json(&path).unwrap_err().kind(), crate::error::ErrorKind::Io);
    }
}
