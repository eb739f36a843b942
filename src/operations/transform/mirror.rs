use crate::error::{GeometryError, Result};
use crate::math::{is_finite_point, Point3, Vector3};

/// Reflects a point sequence through a center point.
///
/// Every point `p` maps to `2 * center - p`, which in the track plane is a
/// half turn about `center`. An optional offset is added afterwards, used to
/// lift the mirrored strand slightly off the source points.
pub struct Mirror<'a> {
    points: &'a [Point3],
    center: Point3,
    offset: Vector3,
}

impl<'a> Mirror<'a> {
    /// Creates a new `Mirror` operation.
    #[must_use]
    pub fn new(points: &'a [Point3], center: Point3) -> Self {
        Self {
            points,
            center,
            offset: Vector3::zeros(),
        }
    }

    /// Adds a displacement applied to every mirrored point.
    #[must_use]
    pub fn with_offset(mut self, offset: Vector3) -> Self {
        self.offset = offset;
        self
    }

    /// Executes the reflection, returning the mirrored points in the same order.
    ///
    /// # Errors
    ///
    /// Returns an error if the center or offset is non-finite.
    pub fn execute(&self) -> Result<Vec<Point3>> {
        if !is_finite_point(&self.center) || !self.offset.iter().all(|c| c.is_finite()) {
            return Err(GeometryError::NonFinite("mirror center").into());
        }
        let doubled = self.center.coords * 2.0;
        Ok(self
            .points
            .iter()
            .map(|p| Point3::from(doubled - p.coords + self.offset))
            .collect())
    }
}
