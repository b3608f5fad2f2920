//! Export point clouds to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets, CAD/FE tools or
//! downstream scripts.

use std::fs::File;
use std::path::Path;

use crate::domain::Point;
use crate::error::AppError;

/// Write `x,y,z[,section]` rows with a header.
pub fn write_points_csv(path: &Path, points: &[Point]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);
    let with_section = points.iter().any(|p| p.section.is_some());

    let header: &[&str] = if with_section { &["x", "y", "z", "section"] } else { &["x", "y", "z"] };
    writer
        .write_record(header)
        .map_err(|e| AppError::io(format!("Failed to write export CSV header: {e}")))?;

    for p in points {
        let mut row = vec![format!("{:.10}", p.x), format!("{:.10}", p.y), format!("{:.10}", p.z)];
        if with_section {
            let tag = match p.section {
                Some(crate::domain::Section::Bottom) => "bottom",
                Some(crate::domain::Section::Wall) => "wall",
                None => "",
            };
            row.push(tag.to_string());
        }
        writer
            .write_record(&row)
            .map_err(|e| AppError::io(format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}
