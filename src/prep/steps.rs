//! Step segmentation.
//!
//! Profilometer passes are recorded at (almost) constant x. After sorting by
//! `(x, y)`, a jump in x larger than `threshold_percent` of the previous x marks
//! the start of a new pass:
//!
//! ```text
//! pct[i] = 100 · |x[i] − x[i−1]| / (|x[i−1]| + ε)
//! ```

use crate::domain::{Point, Step};

/// Default split threshold (percent of the previous x).
pub const DEFAULT_STEP_THRESHOLD_PERCENT: f64 = 0.6;

/// Guards the relative jump against `x[i−1] = 0`.
const JUMP_EPS: f64 = 1e-10;

/// Relative jump between consecutive x values, in percent.
pub fn jump_percent(prev_x: f64, x: f64) -> f64 {
    100.0 * (x - prev_x).abs() / (prev_x.abs() + JUMP_EPS)
}

/// Points sorted by x, then y. Stable, so equal keys keep input order.
pub fn sort_xy(points: &[Point]) -> Vec<Point> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted
}

/// Split `points` into contiguous steps.
///
/// The concatenation of the returned steps is exactly `sort_xy(points)`.
pub fn find_steps(points: &[Point], threshold_percent: f64) -> Vec<Step> {
    let sorted = sort_xy(points);
    if sorted.is_empty() {
        return Vec::new();
    }

    let mut steps = Vec::new();
    let mut start = 0;
    for i in 1..sorted.len() {
        if jump_percent(sorted[i - 1].x, sorted[i].x) > threshold_percent {
            steps.push(make_step(steps.len() + 1, &sorted[start..i]));
            start = i;
        }
    }
    steps.push(make_step(steps.len() + 1, &sorted[start..]));
    steps
}

fn make_step(step_number: usize, points: &[Point]) -> Step {
    let mean_x = points.iter().map(|p| p.x).sum::<f64>() / points.len() as f64;
    Step {
        step_number,
        point_count: points.len(),
        mean_x,
        points: points.to_vec(),
    }
}

/// Concatenate (possibly edited) steps back into one point set.
pub fn flatten_steps(steps: &[Step]) -> Vec<Point> {
    steps.iter().flat_map(|s| s.points.iter().copied()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn passes() -> Vec<Point> {
        // Three passes at x ≈ 10, 20, 30 with a tiny jitter, shuffled.
        let mut pts = Vec::new();
        for (k, &x0) in [30.0, 10.0, 20.0].iter().enumerate() {
            for j in 0..5 {
                pts.push(Point::new(x0 + 0.001 * j as f64, (5 - j + k) as f64, 0.0));
            }
        }
        pts
    }

    #[test]
    fn splits_at_large_jumps() {
        let steps = find_steps(&passes(), DEFAULT_STEP_THRESHOLD_PERCENT);
        assert_eq!(steps.len(), 3);
        let means: Vec<f64> = steps.iter().map(|s| s.mean_x).collect();
        assert!((means[0] - 10.002).abs() < 1e-9);
        assert!((means[1] - 20.002).abs() < 1e-9);
        assert!((means[2] - 30.002).abs() < 1e-9);
        assert!(steps.iter().all(|s| s.point_count == 5));
        assert_eq!(steps.iter().map(|s| s.step_number).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn degenerate_inputs() {
        assert!(find_steps(&[], 0.6).is_empty());
        let one = find_steps(&[Point::new(1.0, 2.0, 3.0)], 0.6);
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].point_count, 1);
    }

    #[test]
    fn no_discontinuity_yields_single_step() {
        let pts: Vec<Point> = (0..10).map(|i| Point::new(100.0 + 0.01 * i as f64, 0.0, 0.0)).collect();
        assert_eq!(find_steps(&pts, 0.6).len(), 1);
    }

    #[test]
    fn zero_x_does_not_divide_by_zero() {
        let pts = vec![Point::new(0.0, 0.0, 0.0), Point::new(0.0, 1.0, 0.0), Point::new(1.0, 0.0, 0.0)];
        let steps = find_steps(&pts, 0.6);
        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].point_count, 2);
    }

    #[test]
    fn ties_in_x_are_ordered_by_y() {
        let pts = vec![Point::new(1.0, 3.0, 0.0), Point::new(1.0, 1.0, 0.0), Point::new(1.0, 2.0, 0.0)];
        let steps = find_steps(&pts, 0.6);
        let ys: Vec<f64> = steps[0].points.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![1.0, 2.0, 3.0]);
    }

    proptest! {
        #[test]
        fn steps_partition_the_sorted_input(
            raw in prop::collection::vec((0.0..50.0f64, 0.0..5.0f64), 0..80),
            t in 0.1..5.0f64,
        ) {
            let pts: Vec<Point> = raw.into_iter().map(|(x, y)| Point::new(x, y, 0.0)).collect();
            let steps = find_steps(&pts, t);

            let total: usize = steps.iter().map(|s| s.point_count).sum();
            prop_assert_eq!(total, pts.len());
            prop_assert_eq!(flatten_steps(&steps), sort_xy(&pts));

            for s in &steps {
                prop_assert_eq!(s.points.len(), s.point_count);
                for w in s.points.windows(2) {
                    prop_assert!(jump_percent(w[0].x, w[1].x) <= t);
                }
            }
            for w in steps.windows(2) {
                let last = w[0].points.last().unwrap();
                let first = w[1].points.first().unwrap();
                prop_assert!(jump_percent(last.x, first.x) > t);
            }
        }
    }
}
