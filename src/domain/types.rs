//! Shared domain types.
//!
//! These types are kept lightweight and serializable so they can be:
//!
//! - used in-memory during cleaning, fitting and mesh rebuilding
//! - exported to JSON/CSV
//! - reloaded later for model algebra or rebuilding

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Which part of a T-shaped specimen a measured point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Bottom,
    Wall,
}

/// Coordinate axis of a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

/// A single measured (or synthesized) point.
///
/// Profile curves are stored with `y = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<Section>,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            section: None,
        }
    }

    /// A 2D profile point `(x, z)`.
    pub fn profile(x: f64, z: f64) -> Self {
        Self::new(x, 0.0, z)
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.section = Some(section);
        self
    }

    pub fn coord(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

/// One contiguous measurement pass produced by the step segmenter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// 1-based position in the sorted sequence.
    pub step_number: usize,
    pub point_count: usize,
    pub mean_x: f64,
    pub points: Vec<Point>,
}

/// Regression basis selector (CLI-facing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Basis {
    /// `z = p(x)`, coefficients highest power first.
    #[value(name = "poly1d")]
    Poly1d,
    /// `z = Σ aₖxᵏ + bₖyᵏ + c`, no cross terms.
    #[value(name = "poly2d")]
    Poly2d,
    /// `z = Σ cᵢⱼ Tᵢ(x')Tⱼ(y')` over normalized coordinates.
    Chebyshev,
}

impl Basis {
    pub fn display_name(self) -> &'static str {
        match self {
            Basis::Poly1d => "poly-1d",
            Basis::Poly2d => "poly-2d (separable)",
            Basis::Chebyshev => "chebyshev-2d",
        }
    }

    pub fn layout(self, degree: usize) -> TermLayout {
        match self {
            Basis::Poly1d => TermLayout::Descending { degree },
            Basis::Poly2d => TermLayout::Separable { degree },
            Basis::Chebyshev => TermLayout::Tensor { degree },
        }
    }
}

/// Coefficient ordering contract of a basis.
///
/// All index arithmetic over coefficient vectors goes through this type:
/// vector length and the alignment of a lower-degree layout inside a higher
/// one are both derived from `(kind, degree)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermLayout {
    /// `[c_d, …, c_1, c_0]`.
    Descending { degree: usize },
    /// `[a_1, b_1, …, a_d, b_d, const]`.
    Separable { degree: usize },
    /// Row-major `(i, j)` for `i, j ∈ 0..=degree`.
    Tensor { degree: usize },
}

impl TermLayout {
    pub fn degree(self) -> usize {
        match self {
            TermLayout::Descending { degree }
            | TermLayout::Separable { degree }
            | TermLayout::Tensor { degree } => degree,
        }
    }

    pub fn len(self) -> usize {
        match self {
            TermLayout::Descending { degree } => degree + 1,
            TermLayout::Separable { degree } => 2 * degree + 1,
            TermLayout::Tensor { degree } => (degree + 1) * (degree + 1),
        }
    }

    pub fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Position in `self` of term `idx` of `lower` (same kind, lower or equal degree).
    ///
    /// Returns `None` when the layouts are of different kinds, `lower` has a
    /// higher degree, or `idx` is out of range.
    pub fn embed_index(self, lower: TermLayout, idx: usize) -> Option<usize> {
        if idx >= lower.len() {
            return None;
        }
        match (self, lower) {
            (TermLayout::Descending { degree: hi }, TermLayout::Descending { degree: lo }) if lo <= hi => {
                Some(idx + (hi - lo))
            }
            (TermLayout::Separable { degree: hi }, TermLayout::Separable { degree: lo }) if lo <= hi => {
                if idx == 2 * lo {
                    Some(2 * hi)
                } else {
                    Some(idx)
                }
            }
            (TermLayout::Tensor { degree: hi }, TermLayout::Tensor { degree: lo }) if lo <= hi => {
                let (i, j) = (idx / (lo + 1), idx % (lo + 1));
                Some(i * (hi + 1) + j)
            }
            _ => None,
        }
    }
}

/// Affine map `x' = scale * x + shift` used to condition 1D fits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineMap {
    pub scale: f64,
    pub shift: f64,
}

impl AffineMap {
    /// Map `[min, max]` onto `[-1, 1]`.
    pub fn to_unit(min: f64, max: f64) -> Result<Self, AppError> {
        let span = max - min;
        if !(span.is_finite() && span > 0.0) {
            return Err(AppError::validation(format!(
                "normalize: zero or invalid range [{min}, {max}]"
            )));
        }
        Ok(Self {
            scale: 2.0 / span,
            shift: -(max + min) / span,
        })
    }

    pub fn apply(&self, x: f64) -> f64 {
        self.scale * x + self.shift
    }
}

/// Sample bounds used to normalize Chebyshev fits onto `[-1, 1]²`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainBox {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl DomainBox {
    pub fn from_samples(x: &[f64], y: &[f64]) -> Result<Self, AppError> {
        let (x_min, x_max) = min_max(x);
        let (y_min, y_max) = min_max(y);
        let bounds = Self {
            x_min,
            x_max,
            y_min,
            y_max,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.x_max - self.x_min > 0.0 && (self.x_max - self.x_min).is_finite()) {
            return Err(AppError::validation(format!(
                "chebyshev: zero-range x normalization [{}, {}]",
                self.x_min, self.x_max
            )));
        }
        if !(self.y_max - self.y_min > 0.0 && (self.y_max - self.y_min).is_finite()) {
            return Err(AppError::validation(format!(
                "chebyshev: zero-range y normalization [{}, {}]",
                self.y_min, self.y_max
            )));
        }
        Ok(())
    }

    /// Map `(x, y)` into normalized coordinates.
    pub fn normalize(&self, x: f64, y: f64) -> (f64, f64) {
        (
            2.0 * (x - self.x_min) / (self.x_max - self.x_min) - 1.0,
            2.0 * (y - self.y_min) / (self.y_max - self.y_min) - 1.0,
        )
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

/// Normalization metadata attached to a model, compared by `algebra::subtract`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Normalization {
    Affine(AffineMap),
    Box(DomainBox),
}

impl Normalization {
    /// Parameter-wise equality within `tol`.
    pub fn approx_eq(&self, other: &Normalization, tol: f64) -> bool {
        let close = |a: f64, b: f64| (a - b).abs() <= tol;
        match (self, other) {
            (Normalization::Affine(a), Normalization::Affine(b)) => {
                close(a.scale, b.scale) && close(a.shift, b.shift)
            }
            (Normalization::Box(a), Normalization::Box(b)) => {
                close(a.x_min, b.x_min)
                    && close(a.x_max, b.x_max)
                    && close(a.y_min, b.y_min)
                    && close(a.y_max, b.y_max)
            }
            _ => false,
        }
    }
}

/// `z = p(x)`; coefficients highest power first, always in raw-x space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPoly1d")]
pub struct Poly1d {
    degree: usize,
    coeffs: Vec<f64>,
    /// Conditioning map used during the fit (provenance only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    norm: Option<AffineMap>,
}

/// Separable 2D polynomial, `[a₁, b₁, …, a_d, b_d, const]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPoly2d")]
pub struct Poly2dSeparable {
    degree: usize,
    coeffs: Vec<f64>,
}

/// Chebyshev tensor-product surface over normalized coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawChebyshev2d")]
pub struct Chebyshev2d {
    degree: usize,
    coeffs: Vec<f64>,
    norm: DomainBox,
}

impl Chebyshev2d {
    pub fn norm(&self) -> DomainBox {
        self.norm
    }
}

// Wire shapes; every deserialized model goes through the length and box checks.

#[derive(Deserialize)]
struct RawPoly1d {
    degree: usize,
    coeffs: Vec<f64>,
    #[serde(default)]
    norm: Option<AffineMap>,
}

#[derive(Deserialize)]
struct RawPoly2d {
    degree: usize,
    coeffs: Vec<f64>,
}

#[derive(Deserialize)]
struct RawChebyshev2d {
    degree: usize,
    coeffs: Vec<f64>,
    norm: DomainBox,
}

impl TryFrom<RawPoly1d> for Poly1d {
    type Error = AppError;

    fn try_from(raw: RawPoly1d) -> Result<Self, AppError> {
        check_len(Basis::Poly1d, raw.degree, &raw.coeffs)?;
        Ok(Poly1d {
            degree: raw.degree,
            coeffs: raw.coeffs,
            norm: raw.norm,
        })
    }
}

impl TryFrom<RawPoly2d> for Poly2dSeparable {
    type Error = AppError;

    fn try_from(raw: RawPoly2d) -> Result<Self, AppError> {
        check_len(Basis::Poly2d, raw.degree, &raw.coeffs)?;
        Ok(Poly2dSeparable {
            degree: raw.degree,
            coeffs: raw.coeffs,
        })
    }
}

impl TryFrom<RawChebyshev2d> for Chebyshev2d {
    type Error = AppError;

    fn try_from(raw: RawChebyshev2d) -> Result<Self, AppError> {
        check_len(Basis::Chebyshev, raw.degree, &raw.coeffs)?;
        raw.norm.validate()?;
        Ok(Chebyshev2d {
            degree: raw.degree,
            coeffs: raw.coeffs,
            norm: raw.norm,
        })
    }
}

/// A fitted model. Every "modifying" operation returns a new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FitModel {
    Poly1d(Poly1d),
    Poly2dSeparable(Poly2dSeparable),
    Chebyshev2d(Chebyshev2d),
}

impl FitModel {
    pub fn poly_1d(degree: usize, coeffs: Vec<f64>, norm: Option<AffineMap>) -> Result<Self, AppError> {
        check_len(Basis::Poly1d, degree, &coeffs)?;
        Ok(FitModel::Poly1d(Poly1d { degree, coeffs, norm }))
    }

    pub fn poly_2d(degree: usize, coeffs: Vec<f64>) -> Result<Self, AppError> {
        check_len(Basis::Poly2d, degree, &coeffs)?;
        Ok(FitModel::Poly2dSeparable(Poly2dSeparable { degree, coeffs }))
    }

    pub fn chebyshev_2d(degree: usize, coeffs: Vec<f64>, norm: DomainBox) -> Result<Self, AppError> {
        check_len(Basis::Chebyshev, degree, &coeffs)?;
        norm.validate()?;
        Ok(FitModel::Chebyshev2d(Chebyshev2d { degree, coeffs, norm }))
    }

    pub fn basis(&self) -> Basis {
        match self {
            FitModel::Poly1d(_) => Basis::Poly1d,
            FitModel::Poly2dSeparable(_) => Basis::Poly2d,
            FitModel::Chebyshev2d(_) => Basis::Chebyshev,
        }
    }

    pub fn degree(&self) -> usize {
        match self {
            FitModel::Poly1d(m) => m.degree,
            FitModel::Poly2dSeparable(m) => m.degree,
            FitModel::Chebyshev2d(m) => m.degree,
        }
    }

    pub fn coeffs(&self) -> &[f64] {
        match self {
            FitModel::Poly1d(m) => &m.coeffs,
            FitModel::Poly2dSeparable(m) => &m.coeffs,
            FitModel::Chebyshev2d(m) => &m.coeffs,
        }
    }

    pub fn layout(&self) -> TermLayout {
        self.basis().layout(self.degree())
    }

    pub fn normalization(&self) -> Option<Normalization> {
        match self {
            FitModel::Poly1d(m) => m.norm.map(Normalization::Affine),
            FitModel::Poly2dSeparable(_) => None,
            FitModel::Chebyshev2d(m) => Some(Normalization::Box(m.norm)),
        }
    }

    /// Same basis, degree and normalization, new coefficients.
    pub fn with_coeffs(&self, coeffs: Vec<f64>) -> Result<Self, AppError> {
        match self {
            FitModel::Poly1d(m) => Self::poly_1d(m.degree, coeffs, m.norm),
            FitModel::Poly2dSeparable(m) => Self::poly_2d(m.degree, coeffs),
            FitModel::Chebyshev2d(m) => Self::chebyshev_2d(m.degree, coeffs, m.norm),
        }
    }

    /// Re-check the length, box and finiteness invariants.
    pub fn validate(&self) -> Result<(), AppError> {
        check_len(self.basis(), self.degree(), self.coeffs())?;
        if let FitModel::Chebyshev2d(m) = self {
            m.norm.validate()?;
        }
        if self.coeffs().iter().any(|c| !c.is_finite()) {
            return Err(AppError::validation(format!(
                "{} model (degree {}) has non-finite coefficients",
                self.basis().display_name(),
                self.degree()
            )));
        }
        Ok(())
    }
}

fn check_len(basis: Basis, degree: usize, coeffs: &[f64]) -> Result<(), AppError> {
    let expected = basis.layout(degree).len();
    if coeffs.len() != expected {
        return Err(AppError::validation(format!(
            "{} degree {degree} needs {expected} coefficients, got {}",
            basis.display_name(),
            coeffs.len()
        )));
    }
    Ok(())
}

/// Residual diagnostics of a model against a point set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorMetrics {
    pub mse: f64,
    pub rmse: f64,
    pub max_abs_error: f64,
    pub n: usize,
}

/// Closed axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Rect {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x <= self.x_max && y >= self.y_min && y <= self.y_max
    }
}

/// T-shape dimensions: a horizontal bar with a vertical bar standing on it.
///
/// The vertical bar's left edge sits at `h_width - offset_1 - offset_2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TShapeDims {
    pub h_width: f64,
    pub h_thickness: f64,
    pub v_width: f64,
    pub v_height: f64,
    pub offset_1: f64,
    pub offset_2: f64,
}

impl TShapeDims {
    pub fn vertical_x(&self) -> f64 {
        self.h_width - self.offset_1 - self.offset_2
    }

    pub fn horizontal_bar(&self) -> Rect {
        Rect {
            x_min: 0.0,
            x_max: self.h_width,
            y_min: 0.0,
            y_max: self.h_thickness,
        }
    }

    pub fn vertical_bar(&self) -> Rect {
        let x0 = self.vertical_x();
        Rect {
            x_min: x0,
            x_max: x0 + self.v_width,
            y_min: self.h_thickness,
            y_max: self.h_thickness + self.v_height,
        }
    }
}

/// Planar domain a model is rebuilt over.
///
/// Deserializes from the raw dimension dictionary: T-shape keys take
/// precedence, `{width, height}` is a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GeometrySpec {
    TShape(TShapeDims),
    Rectangle { width: f64, height: f64 },
}

impl GeometrySpec {
    pub fn validate(&self) -> Result<(), AppError> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(AppError::geometry(format!("geometry: {name} must be finite and > 0, got {v}")))
            }
        };
        match self {
            GeometrySpec::Rectangle { width, height } => {
                positive("width", *width)?;
                positive("height", *height)
            }
            GeometrySpec::TShape(d) => {
                positive("h_width", d.h_width)?;
                positive("h_thickness", d.h_thickness)?;
                positive("v_width", d.v_width)?;
                positive("v_height", d.v_height)?;
                let x0 = d.vertical_x();
                if !(x0.is_finite() && x0 >= 0.0 && x0 + d.v_width <= d.h_width + 1e-9) {
                    return Err(AppError::geometry(format!(
                        "geometry: vertical bar [{x0}, {}] is outside the horizontal bar [0, {}]",
                        x0 + d.v_width,
                        d.h_width
                    )));
                }
                Ok(())
            }
        }
    }
}

/// Grid spacing in x and y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridStep {
    pub dx: f64,
    pub dy: f64,
}

impl GridStep {
    pub fn uniform(step: f64) -> Self {
        Self { dx: step, dy: step }
    }
}

/// Per-section IQR multipliers on z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionFactors {
    pub bottom: f64,
    pub wall: f64,
    /// Light final pass over the merged cloud.
    pub merged: f64,
}

impl Default for SectionFactors {
    fn default() -> Self {
        Self {
            bottom: 0.2,
            wall: 1.5,
            merged: 2.0,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub basis: Basis,
    /// Degrees `1..=max_degree` are swept.
    pub max_degree: usize,
    pub factors: SectionFactors,
    /// Affine-normalize x before 1D fits.
    pub normalize_x: bool,
    /// Ridge strength for 1D fits (0 = ordinary least squares).
    pub ridge_alpha: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            basis: Basis::Poly2d,
            max_degree: 5,
            factors: SectionFactors::default(),
            normalize_x: false,
            ridge_alpha: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_lengths_follow_degree() {
        assert_eq!(TermLayout::Descending { degree: 3 }.len(), 4);
        assert_eq!(TermLayout::Separable { degree: 3 }.len(), 7);
        assert_eq!(TermLayout::Tensor { degree: 3 }.len(), 16);
    }

    #[test]
    fn embed_descending_aligns_constant() {
        let hi = TermLayout::Descending { degree: 3 };
        let lo = TermLayout::Descending { degree: 1 };
        assert_eq!(hi.embed_index(lo, 0), Some(2));
        assert_eq!(hi.embed_index(lo, 1), Some(3));
        assert_eq!(hi.embed_index(lo, 2), None);
    }

    #[test]
    fn embed_separable_keeps_leading_pairs_and_constant() {
        let hi = TermLayout::Separable { degree: 3 };
        let lo = TermLayout::Separable { degree: 1 };
        assert_eq!(hi.embed_index(lo, 0), Some(0));
        assert_eq!(hi.embed_index(lo, 1), Some(1));
        assert_eq!(hi.embed_index(lo, 2), Some(6));
    }

    #[test]
    fn embed_tensor_matches_indices() {
        let hi = TermLayout::Tensor { degree: 2 };
        let lo = TermLayout::Tensor { degree: 1 };
        // (1, 1) in a 2x2 grid -> (1, 1) in a 3x3 grid.
        assert_eq!(hi.embed_index(lo, 3), Some(4));
        assert_eq!(hi.embed_index(lo, 2), Some(3));
    }

    #[test]
    fn embed_rejects_mixed_kinds_and_higher_lower() {
        let a = TermLayout::Tensor { degree: 2 };
        let b = TermLayout::Separable { degree: 1 };
        assert_eq!(a.embed_index(b, 0), None);
        let lo = TermLayout::Descending { degree: 1 };
        let hi = TermLayout::Descending { degree: 2 };
        assert_eq!(lo.embed_index(hi, 0), None);
    }

    #[test]
    fn constructors_reject_wrong_lengths() {
        assert!(FitModel::poly_1d(2, vec![1.0, 2.0], None).is_err());
        assert!(FitModel::poly_2d(1, vec![1.0, 2.0, 3.0]).is_ok());
        let norm = DomainBox {
            x_min: 0.0,
            x_max: 1.0,
            y_min: 0.0,
            y_max: 1.0,
        };
        assert!(FitModel::chebyshev_2d(1, vec![0.0; 3], norm).is_err());
    }

    #[test]
    fn zero_range_domain_is_rejected() {
        let err = DomainBox::from_samples(&[1.0, 1.0], &[0.0, 2.0]).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Validation);
    }

    #[test]
    fn geometry_parses_from_dimension_dicts() {
        let rect: GeometrySpec = serde_json::from_str(r#"{"width": 10.0, "height": 4.0}"#).unwrap();
        assert_eq!(rect, GeometrySpec::Rectangle { width: 10.0, height: 4.0 });

        let t: GeometrySpec = serde_json::from_str(
            r#"{"h_width": 40, "h_thickness": 5, "v_width": 6, "v_height": 20, "offset_1": 10, "offset_2": 7}"#,
        )
        .unwrap();
        let GeometrySpec::TShape(dims) = t else {
            panic!("expected a T-shape");
        };
        assert!((dims.vertical_x() - 23.0).abs() < 1e-12);
    }

    #[test]
    fn t_shape_with_overhanging_bar_is_invalid() {
        let spec = GeometrySpec::TShape(TShapeDims {
            h_width: 10.0,
            h_thickness: 2.0,
            v_width: 4.0,
            v_height: 5.0,
            offset_1: 0.0,
            offset_2: 0.0,
        });
        assert!(spec.validate().is_err());
    }

    #[test]
    fn model_json_carries_type_tag() {
        let m = FitModel::poly_2d(1, vec![1.0, 2.0, 0.5]).unwrap();
        let s = serde_json::to_string(&m).unwrap();
        assert!(s.contains(r#""type":"poly2d_separable""#), "{s}");
        let back: FitModel = serde_json::from_str(&s).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn deserializing_wrong_coefficient_count_fails() {
        let err = serde_json::from_str::<FitModel>(r#"{"type":"poly2d_separable","degree":2,"coeffs":[1,2,3]}"#)
            .unwrap_err();
        assert!(err.to_string().contains("needs 5 coefficients"), "{err}");

        assert!(serde_json::from_str::<FitModel>(r#"{"type":"poly1d","degree":1,"coeffs":[1]}"#).is_err());
        assert!(
            serde_json::from_str::<FitModel>(
                r#"{"type":"chebyshev2d","degree":0,"coeffs":[1,2],
                    "norm":{"x_min":0,"x_max":1,"y_min":0,"y_max":1}}"#
            )
            .is_err()
        );
    }

    #[test]
    fn deserializing_collapsed_chebyshev_box_fails() {
        let json = r#"{"type":"chebyshev2d","degree":0,"coeffs":[1],
                       "norm":{"x_min":2,"x_max":2,"y_min":0,"y_max":1}}"#;
        let err = serde_json::from_str::<FitModel>(json).unwrap_err();
        assert!(err.to_string().contains("zero-range x"), "{err}");
    }

    #[test]
    fn deserializing_valid_poly1d_keeps_its_map() {
        let json = r#"{"type":"poly1d","degree":1,"coeffs":[2,1],"norm":{"scale":0.5,"shift":-1}}"#;
        let m: FitModel = serde_json::from_str(json).unwrap();
        assert_eq!(
            m.normalization(),
            Some(Normalization::Affine(AffineMap { scale: 0.5, shift: -1.0 }))
        );
    }
}
