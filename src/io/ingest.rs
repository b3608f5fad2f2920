//! Point-cloud and profile ingest.
//!
//! Two input shapes are supported:
//!
//! - section-tagged surface files: whitespace columns `x y z`, with `#bottom`
//!   / `#wall` marker lines switching the section of the following rows
//! - profile curves: two (`x z`) or three (`x y z`) columns, either as
//!   whitespace text with `#` comments or as `.csv`
//!
//! Decimal commas (`1,25`) are accepted in the text formats. Malformed rows in
//! surface files are skipped and reported; curve files are strict.

use std::fs::{self, File};
use std::path::Path;

use crate::domain::{Point, Section};
use crate::error::AppError;
use crate::prep::TransformRules;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: parsed points plus the rows that were skipped.
#[derive(Debug, Clone)]
pub struct IngestedPoints {
    pub points: Vec<Point>,
    pub row_errors: Vec<RowError>,
    /// Non-empty lines, markers and comments included.
    pub lines_read: usize,
}

impl IngestedPoints {
    pub fn section(&self, section: Section) -> Vec<Point> {
        self.points.iter().filter(|p| p.section == Some(section)).copied().collect()
    }
}

/// Parse a section-tagged surface file already in memory.
///
/// Rows before the first marker get `default_section`.
pub fn parse_points(text: &str, default_section: Option<Section>) -> IngestedPoints {
    let mut current = default_section;
    let mut points = Vec::new();
    let mut row_errors = Vec::new();
    let mut lines_read = 0usize;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        lines_read += 1;
        let lower = line.to_ascii_lowercase();
        if lower.contains("#bottom") {
            current = Some(Section::Bottom);
            continue;
        }
        if lower.contains("#wall") {
            current = Some(Section::Wall);
            continue;
        }
        if line.starts_with('#') {
            continue;
        }

        match parse_values(line) {
            Ok(v) if v.len() >= 3 => {
                let mut p = Point::new(v[0], v[1], v[2]);
                p.section = current;
                points.push(p);
            }
            Ok(v) => row_errors.push(RowError {
                line: idx + 1,
                message: format!("expected 3 columns, found {}", v.len()),
            }),
            Err(message) => row_errors.push(RowError {
                line: idx + 1,
                message,
            }),
        }
    }

    IngestedPoints {
        points,
        row_errors,
        lines_read,
    }
}

/// Load a section-tagged surface file.
pub fn load_points(path: &Path, default_section: Option<Section>) -> Result<IngestedPoints, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::io(format!("load_points: failed to read '{}': {e}", path.display())))?;
    let ingested = parse_points(&text, default_section);
    for err in &ingested.row_errors {
        tracing::warn!(file = %path.display(), line = err.line, "skipped row: {}", err.message);
    }
    if ingested.points.is_empty() {
        return Err(AppError::io(format!("load_points: no valid points in '{}'", path.display())));
    }
    Ok(ingested)
}

/// Load a profile curve (`.csv` or whitespace text).
pub fn load_curve(path: &Path) -> Result<Vec<Point>, AppError> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    let points = if is_csv {
        read_curve_csv(path)?
    } else {
        let text = fs::read_to_string(path)
            .map_err(|e| AppError::io(format!("load_curve: failed to read '{}': {e}", path.display())))?;
        parse_curve_text(&text)?
    };
    if points.is_empty() {
        return Err(AppError::io(format!("load_curve: no points in '{}'", path.display())));
    }
    Ok(points)
}

/// Parse whitespace curve text. Any malformed row is an error.
pub fn parse_curve_text(text: &str) -> Result<Vec<Point>, AppError> {
    let mut out = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let values = parse_values(line).map_err(|m| AppError::io(format!("load_curve: line {}: {m}", idx + 1)))?;
        out.push(curve_point(&values).map_err(|m| AppError::io(format!("load_curve: line {}: {m}", idx + 1)))?);
    }
    Ok(out)
}

fn read_curve_csv(path: &Path) -> Result<Vec<Point>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("load_curve: failed to open '{}': {e}", path.display())))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut out = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| AppError::io(format!("load_curve: CSV parse error: {e}")))?;
        let values: Result<Vec<f64>, _> = record.iter().map(str::parse::<f64>).collect();
        match values {
            Ok(v) => out.push(
                curve_point(&v).map_err(|m| AppError::io(format!("load_curve: record {}: {m}", idx + 1)))?,
            ),
            // A single leading header row is tolerated.
            Err(_) if idx == 0 => continue,
            Err(e) => return Err(AppError::io(format!("load_curve: record {}: {e}", idx + 1))),
        }
    }
    Ok(out)
}

fn curve_point(values: &[f64]) -> Result<Point, String> {
    match values {
        [x, z] => Ok(Point::profile(*x, *z)),
        [x, y, z] => Ok(Point::new(*x, *y, *z)),
        other => Err(format!("expected 2 or 3 columns, found {}", other.len())),
    }
}

fn parse_values(line: &str) -> Result<Vec<f64>, String> {
    let cleaned = line.replace(',', ".");
    cleaned
        .split_whitespace()
        .map(|tok| {
            let v: f64 = tok.parse().map_err(|_| format!("invalid number `{tok}`"))?;
            if v.is_finite() {
                Ok(v)
            } else {
                Err(format!("non-finite value `{tok}`"))
            }
        })
        .collect()
}

/// Load per-specimen transform rules from JSON.
pub fn load_transform_rules(path: &Path) -> Result<TransformRules, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open transform rules '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::io(format!("Invalid transform rules JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn section_markers_tag_following_rows() {
        let text = "#bottom\n1 2 3\n1,5 2,5 3,5\n#wall\n4 5 6\n";
        let ing = parse_points(text, None);
        assert_eq!(ing.points.len(), 3);
        assert_eq!(ing.points[1], Point::new(1.5, 2.5, 3.5).with_section(Section::Bottom));
        assert_eq!(ing.section(Section::Wall), vec![Point::new(4.0, 5.0, 6.0).with_section(Section::Wall)]);
    }

    #[test]
    fn untagged_rows_use_default_section() {
        let ing = parse_points("0 0 1\n", Some(Section::Wall));
        assert_eq!(ing.points[0].section, Some(Section::Wall));
        let ing = parse_points("0 0 1\n", None);
        assert_eq!(ing.points[0].section, None);
    }

    #[test]
    fn malformed_rows_are_skipped_and_reported() {
        let ing = parse_points("#bottom\n1 2 3\nfoo 1 2\n1 2\n", None);
        assert_eq!(ing.points.len(), 1);
        let lines: Vec<usize> = ing.row_errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![3, 4]);
        assert_eq!(ing.lines_read, 4);
    }

    #[test]
    fn curve_text_accepts_two_and_three_columns() {
        let pts = parse_curve_text("# x z\n0 1\n1 0 2 # trailing\n").unwrap();
        assert_eq!(pts, vec![Point::profile(0.0, 1.0), Point::new(1.0, 0.0, 2.0)]);
        assert!(parse_curve_text("1 2 3 4\n").is_err());
    }

    #[test]
    fn load_curve_reads_csv_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("left.csv");
        let mut f = File::create(&path).unwrap();
        writeln!(f, "x,z").unwrap();
        writeln!(f, "0.0, 1.0").unwrap();
        writeln!(f, "0.5, 1.5").unwrap();
        drop(f);
        let pts = load_curve(&path).unwrap();
        assert_eq!(pts, vec![Point::profile(0.0, 1.0), Point::profile(0.5, 1.5)]);
    }

    #[test]
    fn load_points_from_disk_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s1.txt");
        fs::write(&path, "#wall\n1 1 1\n2 2 2\n").unwrap();
        let ing = load_points(&path, None).unwrap();
        assert_eq!(ing.points.len(), 2);

        let err = load_points(&dir.path().join("nope.txt"), None).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Io);
    }

    #[test]
    fn transform_rules_parse_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        fs::write(&path, r#"{"S1": {"invert_z": true}, "S2": {"mirror_x": true, "offset_z": 0.5}}"#).unwrap();
        let rules = load_transform_rules(&path).unwrap();
        let out = rules.apply("S1", &[Point::new(1.0, 0.0, 2.0)]);
        assert_eq!(out[0].z, -2.0);
    }
}
