use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::math::{is_finite_point, Point3, Vector3, TOLERANCE};

use super::{Curve, CurveDomain};

/// Knot spacings shorter than this are treated as coincident control points.
const MIN_KNOT_SPACING: f64 = 1e-4;

/// Step used for the finite-difference tangent fallback.
const TANGENT_DELTA: f64 = 1e-4;

/// Parameterization of a Catmull-Rom spline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurveType {
    /// Alpha = 0.5. Avoids cusps and self-intersections within a segment.
    #[default]
    Centripetal,
    /// Alpha = 1.
    Chordal,
    /// Uniform knots with the given tension (0.5 is the classic spline).
    Uniform { tension: f64 },
}

/// Cubic polynomial `c0 + c1*w + c2*w^2 + c3*w^3` with vector coefficients.
struct Cubic {
    c0: Vector3,
    c1: Vector3,
    c2: Vector3,
    c3: Vector3,
}

impl Cubic {
    /// Hermite form from two endpoints and their tangents.
    fn hermite(x0: Vector3, x1: Vector3, t0: Vector3, t1: Vector3) -> Self {
        Self {
            c0: x0,
            c1: t0,
            c2: -3.0 * x0 + 3.0 * x1 - 2.0 * t0 - t1,
            c3: 2.0 * x0 - 2.0 * x1 + t0 + t1,
        }
    }

    fn value(&self, w: f64) -> Vector3 {
        self.c0 + w * (self.c1 + w * (self.c2 + w * self.c3))
    }

    fn derivative(&self, w: f64) -> Vector3 {
        self.c1 + w * (2.0 * self.c2 + 3.0 * w * self.c3)
    }
}

/// A Catmull-Rom spline through an ordered list of control points.
///
/// The curve passes through every control point. For open curves the
/// missing outer neighbours at both ends are extrapolated by reflection,
/// so `evaluate(0)` is the first point and `evaluate(1)` the last.
/// Closed curves wrap around and `evaluate(1) == evaluate(0)`.
#[derive(Debug, Clone)]
pub struct CatmullRom {
    points: Vec<Point3>,
    closed: bool,
    curve_type: CurveType,
}

impl CatmullRom {
    /// Creates a new spline.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than 2 points are given or any point is
    /// non-finite.
    pub fn new(points: Vec<Point3>, closed: bool, curve_type: CurveType) -> Result<Self> {
        if points.len() < 2 {
            return Err(GeometryError::Degenerate(
                "a spline needs at least 2 control points".into(),
            )
            .into());
        }
        if !points.iter().all(is_finite_point) {
            return Err(GeometryError::NonFinite("spline control points").into());
        }
        if let CurveType::Uniform { tension } = curve_type {
            if !tension.is_finite() {
                return Err(GeometryError::NonFinite("spline tension").into());
            }
        }
        Ok(Self {
            points,
            closed,
            curve_type,
        })
    }

    /// Creates an open centripetal spline.
    ///
    /// # Errors
    ///
    /// See [`CatmullRom::new`].
    pub fn open(points: Vec<Point3>) -> Result<Self> {
        Self::new(points, false, CurveType::Centripetal)
    }

    /// Returns the control points.
    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// Returns the spline parameterization.
    #[must_use]
    pub fn curve_type(&self) -> CurveType {
        self.curve_type
    }

    /// Locates the segment containing `t` and builds its cubic.
    ///
    /// Returns the cubic and the local weight in `[0, 1]`.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn segment(&self, t: f64) -> (Cubic, f64) {
        let n = self.points.len();
        let t = t.clamp(0.0, 1.0);
        let spans = if self.closed { n } else { n - 1 };

        let p = spans as f64 * t;
        let mut index = p.floor() as usize;
        let mut weight = p - index as f64;

        if self.closed {
            index %= n;
        } else if index >= n - 1 {
            index = n - 2;
            weight = 1.0;
        }

        let p0 = if self.closed || index > 0 {
            self.points[(index + n - 1) % n].coords
        } else {
            2.0 * self.points[0].coords - self.points[1].coords
        };
        let p1 = self.points[index % n].coords;
        let p2 = self.points[(index + 1) % n].coords;
        let p3 = if self.closed || index + 2 < n {
            self.points[(index + 2) % n].coords
        } else {
            2.0 * self.points[n - 1].coords - self.points[n - 2].coords
        };

        let cubic = match self.curve_type {
            CurveType::Centripetal => nonuniform(p0, p1, p2, p3, 0.25),
            CurveType::Chordal => nonuniform(p0, p1, p2, p3, 0.5),
            CurveType::Uniform { tension } => {
                Cubic::hermite(p1, p2, tension * (p2 - p0), tension * (p3 - p1))
            }
        };
        (cubic, weight)
    }
}

/// Non-uniform Catmull-Rom segment between `x1` and `x2`.
///
/// Knot spacing is `|x_{i+1} - x_i|^(2 * exponent)`, computed from squared
/// distances.
fn nonuniform(x0: Vector3, x1: Vector3, x2: Vector3, x3: Vector3, exponent: f64) -> Cubic {
    let mut dt0 = (x1 - x0).norm_squared().powf(exponent);
    let mut dt1 = (x2 - x1).norm_squared().powf(exponent);
    let mut dt2 = (x3 - x2).norm_squared().powf(exponent);

    if dt1 < MIN_KNOT_SPACING {
        dt1 = 1.0;
    }
    if dt0 < MIN_KNOT_SPACING {
        dt0 = dt1;
    }
    if dt2 < MIN_KNOT_SPACING {
        dt2 = dt1;
    }

    let t1 = (x1 - x0) / dt0 - (x2 - x0) / (dt0 + dt1) + (x2 - x1) / dt1;
    let t2 = (x2 - x1) / dt1 - (x3 - x1) / (dt1 + dt2) + (x3 - x2) / dt2;

    Cubic::hermite(x1, x2, t1 * dt1, t2 * dt1)
}

impl Curve for CatmullRom {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        if !t.is_finite() {
            return Err(GeometryError::NonFinite("curve parameter").into());
        }
        let (cubic, weight) = self.segment(t);
        Ok(Point3::from(cubic.value(weight)))
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        if !t.is_finite() {
            return Err(GeometryError::NonFinite("curve parameter").into());
        }
        let (cubic, weight) = self.segment(t);
        let derivative = cubic.derivative(weight);
        let len = derivative.norm();
        if len > TOLERANCE {
            return Ok(derivative / len);
        }

        // Coincident control points can zero the derivative; fall back to a
        // central difference across the stall.
        let before = self.evaluate((t - TANGENT_DELTA).max(0.0))?;
        let after = self.evaluate((t + TANGENT_DELTA).min(1.0))?;
        let chord = after - before;
        let len = chord.norm();
        if len < TOLERANCE {
            return Err(GeometryError::ZeroVector.into());
        }
        Ok(chord / len)
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(0.0, 1.0)
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
