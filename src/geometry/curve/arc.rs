use std::f64::consts::TAU;

use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Curve, CurveDomain};

/// A circular arc parallel to the XY plane.
///
/// The parameter is the angle in radians, measured counter-clockwise from
/// +X around the center. The arc runs from `start_angle` to `end_angle` at
/// the center's depth.
#[derive(Debug, Clone)]
pub struct Arc {
    center: Point3,
    radius: f64,
    start_angle: f64,
    end_angle: f64,
}

impl Arc {
    /// Creates an arc in the plane `z = center.z`.
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not finite and positive, or an
    /// angle is not finite.
    pub fn in_xy_plane(
        center: Point3,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> Result<Self> {
        if !radius.is_finite() || radius < TOLERANCE {
            return Err(GeometryError::Degenerate("arc radius must be positive".into()).into());
        }
        if !start_angle.is_finite() || !end_angle.is_finite() {
            return Err(GeometryError::NonFinite("arc angles").into());
        }
        Ok(Self {
            center,
            radius,
            start_angle,
            end_angle,
        })
    }

    /// Returns the center of the arc.
    #[must_use]
    pub fn center(&self) -> &Point3 {
        &self.center
    }

    /// Returns the radius of the arc.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the signed sweep angle in radians.
    #[must_use]
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Returns the exact length of the arc.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.radius * self.sweep().abs()
    }

    /// Samples the arc at a fixed angular resolution.
    ///
    /// Returns `segments` points at `start + (i / segments) * sweep` for
    /// `i = 1..=segments`. The start point itself is not included, so the
    /// result can be appended directly after the anchor that precedes the arc.
    ///
    /// # Errors
    ///
    /// Returns an error if `segments` is zero.
    pub fn sample(&self, segments: usize) -> Result<Vec<Point3>> {
        if segments == 0 {
            return Err(
                GeometryError::Degenerate("arc needs at least one segment".into()).into(),
            );
        }
        #[allow(clippy::cast_precision_loss)]
        let count = segments as f64;
        (1..=segments)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let fraction = i as f64 / count;
                self.evaluate(self.start_angle + fraction * self.sweep())
            })
            .collect()
    }
}

impl Curve for Arc {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        let (sin, cos) = t.sin_cos();
        Ok(self.center + Vector3::new(cos, sin, 0.0) * self.radius)
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        let (sin, cos) = t.sin_cos();
        // Counter-clockwise when the sweep is positive.
        let direction = if self.sweep() < 0.0 { -1.0 } else { 1.0 };
        Ok(Vector3::new(-sin, cos, 0.0) * direction)
    }

    fn domain(&self) -> CurveDomain {
        CurveDomain::new(self.start_angle, self.end_angle)
    }

    fn is_closed(&self) -> bool {
        (self.sweep().abs() - TAU).abs() < TOLERANCE
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::f64::consts::{FRAC_PI_2, PI};

    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn zero_radius_is_rejected() {
        assert!(Arc::in_xy_plane(Point3::origin(), 0.0, 0.0, PI).is_err());
    }

    #[test]
    fn non_finite_angle_is_rejected() {
        assert!(Arc::in_xy_plane(Point3::origin(), 1.0, 0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn semicircle_samples_end_on_opposite_side() {
        let arc = Arc::in_xy_plane(Point3::new(-2.5, 0.0, 0.0), 2.0, FRAC_PI_2, FRAC_PI_2 + PI)
            .unwrap();
        let points = arc.sample(64).unwrap();

        assert_eq!(points.len(), 64);
        let last = points.last().unwrap();
        assert_relative_eq!(last.x, -2.5, epsilon = 1e-9);
        assert_relative_eq!(last.y, -2.0, epsilon = 1e-9);

        // Halfway through the turn the arc reaches its leftmost point.
        let mid = &points[31];
        assert_relative_eq!(mid.x, -4.5, epsilon = 1e-9);
        assert_relative_eq!(mid.y, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn samples_keep_center_depth() {
        let center = Point3::new(1.0, 1.0, 0.5);
        let arc = Arc::in_xy_plane(center, 3.0, 0.0, PI).unwrap();
        for p in arc.sample(16).unwrap() {
            assert_relative_eq!((p - center).norm(), 3.0, epsilon = 1e-9);
            assert_relative_eq!(p.z, 0.5);
        }
    }

    #[test]
    fn zero_segments_fails() {
        let arc = Arc::in_xy_plane(Point3::origin(), 1.0, 0.0, PI).unwrap();
        assert!(arc.sample(0).is_err());
    }

    #[test]
    fn length_and_closure() {
        let half = Arc::in_xy_plane(Point3::origin(), 2.0, 0.0, PI).unwrap();
        assert_relative_eq!(half.length(), 2.0 * PI, epsilon = 1e-12);
        assert!(!half.is_closed());

        let full = Arc::in_xy_plane(Point3::origin(), 1.0, 0.0, TAU).unwrap();
        assert!(full.is_closed());
    }

    #[test]
    fn tangent_follows_sweep_direction() {
        let ccw = Arc::in_xy_plane(Point3::origin(), 1.0, 0.0, PI).unwrap();
        let radial = ccw.evaluate(0.7).unwrap() - Point3::origin();
        let tangent = ccw.tangent(0.7).unwrap();
        assert_relative_eq!(radial.dot(&tangent), 0.0, epsilon = 1e-12);
        assert_relative_eq!(tangent.norm(), 1.0, epsilon = 1e-12);

        let cw = Arc::in_xy_plane(Point3::origin(), 1.0, PI, 0.0).unwrap();
        assert_relative_eq!(cw.tangent(FRAC_PI_2).unwrap(), Vector3::new(1.0, 0.0, 0.0));
    }
}
