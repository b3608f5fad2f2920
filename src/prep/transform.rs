//! Per-specimen geometric corrections applied to raw points before fitting.
//!
//! Different sides of a specimen are measured in different orientations. A
//! rule brings each side into a common frame:
//!
//! 1. mirror x about `mirror_ref` (default: the maximum x of the data)
//! 2. invert z
//! 3. add offsets

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::Point;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformRule {
    pub mirror_x: bool,
    pub mirror_ref: Option<f64>,
    pub invert_z: bool,
    pub offset_x: f64,
    pub offset_y: f64,
    pub offset_z: f64,
}

impl TransformRule {
    pub fn apply(&self, points: &[Point]) -> Vec<Point> {
        let reference = if self.mirror_x {
            self.mirror_ref
                .unwrap_or_else(|| points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max))
        } else {
            0.0
        };

        points
            .iter()
            .map(|p| {
                let mut q = *p;
                if self.mirror_x {
                    q.x = reference - q.x;
                }
                if self.invert_z {
                    q.z = -q.z;
                }
                q.x += self.offset_x;
                q.y += self.offset_y;
                q.z += self.offset_z;
                q
            })
            .collect()
    }
}

/// Rules keyed by specimen/side identifier (e.g. `"Side2"`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransformRules(pub BTreeMap<String, TransformRule>);

impl TransformRules {
    /// Apply the rule for `id`, or return the points unchanged when none exists.
    pub fn apply(&self, id: &str, points: &[Point]) -> Vec<Point> {
        match self.0.get(id) {
            Some(rule) => rule.apply(points),
            None => points.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirror_defaults_to_max_x() {
        let pts = vec![Point::new(1.0, 0.0, 1.0), Point::new(4.0, 0.0, 2.0)];
        let rule = TransformRule {
            mirror_x: true,
            invert_z: true,
            ..Default::default()
        };
        let out = rule.apply(&pts);
        assert_eq!(out[0], Point::new(3.0, 0.0, -1.0));
        assert_eq!(out[1], Point::new(0.0, 0.0, -2.0));
    }

    #[test]
    fn offsets_and_unknown_ids() {
        let rules: TransformRules =
            serde_json::from_str(r#"{"Side3": {"offset_x": 10.0, "offset_z": -0.5}}"#).unwrap();
        let pts = vec![Point::new(1.0, 2.0, 3.0)];
        assert_eq!(rules.apply("Side3", &pts), vec![Point::new(11.0, 2.0, 2.5)]);
        assert_eq!(rules.apply("Side1", &pts), pts);
    }
}
