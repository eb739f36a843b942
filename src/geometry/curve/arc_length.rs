use crate::error::{GeometryError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};

use super::{Curve, CurveDomain};

/// Default number of parameter steps used to tabulate arc length.
pub const DEFAULT_DIVISIONS: usize = 200;

/// Cumulative chord lengths of a curve sampled at uniform parameter steps.
///
/// Maps a fraction of total arc length back to a curve parameter, which
/// lets callers place samples at equal distances along the curve.
#[derive(Debug, Clone)]
pub struct ArcLengthTable {
    lengths: Vec<f64>,
    domain: CurveDomain,
}

impl ArcLengthTable {
    /// Tabulates `curve` with `divisions` uniform parameter steps.
    ///
    /// # Errors
    ///
    /// Returns an error if `divisions` is zero, the domain is unbounded, or
    /// the curve fails to evaluate.
    pub fn new<C: Curve + ?Sized>(curve: &C, divisions: usize) -> Result<Self> {
        if divisions == 0 {
            return Err(
                GeometryError::Degenerate("arc length table needs divisions".into()).into(),
            );
        }
        let domain = curve.domain();
        if !domain.t_min.is_finite() || !domain.t_max.is_finite() {
            return Err(GeometryError::NonFinite("curve domain").into());
        }

        #[allow(clippy::cast_precision_loss)]
        let steps = divisions as f64;
        let mut lengths = Vec::with_capacity(divisions + 1);
        let mut previous = curve.evaluate(domain.t_min)?;
        let mut total = 0.0;
        lengths.push(total);

        for i in 1..=divisions {
            #[allow(clippy::cast_precision_loss)]
            let point = curve.evaluate(domain.lerp(i as f64 / steps))?;
            total += (point - previous).norm();
            lengths.push(total);
            previous = point;
        }

        Ok(Self { lengths, domain })
    }

    /// Returns the total tabulated length.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    /// Returns the cumulative lengths, one per parameter step.
    #[must_use]
    pub fn lengths(&self) -> &[f64] {
        &self.lengths
    }

    /// Converts an arc-length fraction `u` in `[0, 1]` to a curve parameter.
    #[must_use]
    pub fn parameter_at(&self, u: f64) -> f64 {
        let last = self.lengths.len() - 1;
        let total = self.total();
        if total < TOLERANCE || u <= 0.0 {
            return self.domain.lerp(u.clamp(0.0, 1.0));
        }
        let target = u.min(1.0) * total;

        // First index whose cumulative length reaches the target.
        let upper = self.lengths.partition_point(|&l| l < target);
        if upper == 0 {
            return self.domain.t_min;
        }
        if upper > last {
            return self.domain.t_max;
        }

        let lower = upper - 1;
        let before = self.lengths[lower];
        let segment = self.lengths[upper] - before;
        let fraction = if segment > TOLERANCE {
            (target - before) / segment
        } else {
            0.0
        };

        #[allow(clippy::cast_precision_loss)]
        let normalized = (lower as f64 + fraction) / last as f64;
        self.domain.lerp(normalized)
    }

    /// Evaluates `curve` at arc-length fraction `u`.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve fails to evaluate.
    pub fn point_at<C: Curve + ?Sized>(&self, curve: &C, u: f64) -> Result<Point3> {
        curve.evaluate(self.parameter_at(u))
    }

    /// Returns the unit tangent of `curve` at arc-length fraction `u`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tangent is degenerate.
    pub fn tangent_at<C: Curve + ?Sized>(&self, curve: &C, u: f64) -> Result<Vector3> {
        curve.tangent(self.parameter_at(u))
    }
}
