use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::geometry::curve::Curve;
use crate::math::{Axis, Point3, TOLERANCE};

/// Default number of parameter steps walked by [`StopRatio`].
pub const DEFAULT_STOP_SAMPLES: usize = 200;

/// Decides, point by point along a curve, whether the stop has been reached.
pub trait StopCondition {
    /// Returns `true` once `point` satisfies the condition.
    fn reached(&mut self, point: &Point3) -> bool;
}

impl<F> StopCondition for F
where
    F: FnMut(&Point3) -> bool,
{
    fn reached(&mut self, point: &Point3) -> bool {
        self(point)
    }
}

/// Direction from which a threshold coordinate is approached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Approach {
    /// Reached when the coordinate drops to or below the threshold.
    FromAbove,
    /// Reached when the coordinate rises to or above the threshold.
    FromBelow,
    /// Picks the direction from the first sampled point.
    Auto,
}

/// Built-in stop conditions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StopPredicate {
    /// Crossing of a coordinate threshold on one axis.
    Threshold {
        axis: Axis,
        threshold: f64,
        approach: Approach,
    },
    /// First point within `tolerance` of `target`.
    Near { target: Point3, tolerance: f64 },
}

impl StopPredicate {
    /// Threshold crossing whose direction is inferred from the first sample.
    #[must_use]
    pub fn crossing(axis: Axis, threshold: f64) -> Self {
        Self::Threshold {
            axis,
            threshold,
            approach: Approach::Auto,
        }
    }

    /// Proximity to a target point.
    #[must_use]
    pub fn near(target: Point3, tolerance: f64) -> Self {
        Self::Near { target, tolerance }
    }
}

impl StopCondition for StopPredicate {
    fn reached(&mut self, point: &Point3) -> bool {
        match self {
            Self::Threshold {
                axis,
                threshold,
                approach,
            } => {
                let value = axis.component(point);
                if *approach == Approach::Auto {
                    *approach = if value >= *threshold {
                        Approach::FromAbove
                    } else {
                        Approach::FromBelow
                    };
                }
                match approach {
                    Approach::FromAbove => value <= *threshold,
                    Approach::FromBelow | Approach::Auto => value >= *threshold,
                }
            }
            Self::Near { target, tolerance } => (point - *target).norm() < *tolerance,
        }
    }
}

/// Finds the fraction of a curve's arc length at which a stop condition is
/// first met.
///
/// The curve is walked at equally spaced parameter values while chord
/// lengths are accumulated. The result is
/// `length_at_first_hit / total_length`, in `[0, 1]`. A condition that is
/// never met, or a curve of zero length, yields `0`; callers treat that as
/// "no stop" rather than "stop immediately".
pub struct StopRatio<'a, C: Curve + ?Sized, P: StopCondition> {
    curve: &'a C,
    condition: P,
    samples: usize,
}

impl<'a, C: Curve + ?Sized, P: StopCondition> StopRatio<'a, C, P> {
    /// Creates a new `StopRatio` query.
    #[must_use]
    pub fn new(curve: &'a C, condition: P) -> Self {
        Self {
            curve,
            condition,
            samples: DEFAULT_STOP_SAMPLES,
        }
    }

    /// Sets the number of parameter steps to walk.
    #[must_use]
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Executes the query.
    ///
    /// # Errors
    ///
    /// Returns an error if `samples` is zero, the curve domain is unbounded,
    /// or the curve fails to evaluate.
    pub fn execute(mut self) -> Result<f64> {
        if self.samples == 0 {
            return Err(GeometryError::Degenerate("stop ratio needs samples".into()).into());
        }
        let domain = self.curve.domain();
        if !domain.t_min.is_finite() || !domain.t_max.is_finite() {
            return Err(GeometryError::NonFinite("curve domain").into());
        }

        #[allow(clippy::cast_precision_loss)]
        let steps = self.samples as f64;
        let mut previous = self.curve.evaluate(domain.t_min)?;
        let mut total = 0.0;
        let mut stop_at = self.condition.reached(&previous).then_some(0.0);

        for i in 1..=self.samples {
            #[allow(clippy::cast_precision_loss)]
            let point = self.curve.evaluate(domain.lerp(i as f64 / steps))?;
            total += (point - previous).norm();
            if stop_at.is_none() && self.condition.reached(&point) {
                stop_at = Some(total);
            }
            previous = point;
        }

        if total < TOLERANCE {
            return Ok(0.0);
        }
        match stop_at {
            Some(length) => Ok((length / total).clamp(0.0, 1.0)),
            None => {
                tracing::warn!(samples = self.samples, "stop condition never met");
                Ok(0.0)
            }
        }
    }
}
