use serde::{Deserialize, Serialize};

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 3D rotation type.
pub type Rotation3 = nalgebra::Rotation3<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// A world coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Returns the component of `point` along this axis.
    #[must_use]
    pub fn component(self, point: &Point3) -> f64 {
        match self {
            Self::X => point.x,
            Self::Y => point.y,
            Self::Z => point.z,
        }
    }
}

/// Returns `true` if every coordinate of `point` is finite.
#[must_use]
pub fn is_finite_point(point: &Point3) -> bool {
    point.iter().all(|c| c.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_component_picks_coordinate() {
        let p = Point3::new(1.0, 2.0, 3.0);
        assert!((Axis::X.component(&p) - 1.0).abs() < TOLERANCE);
        assert!((Axis::Y.component(&p) - 2.0).abs() < TOLERANCE);
        assert!((Axis::Z.component(&p) - 3.0).abs() < TOLERANCE);
    }

    #[test]
    fn finite_point_detection() {
        assert!(is_finite_point(&Point3::new(0.0, -1.0, 5.0)));
        assert!(!is_finite_point(&Point3::new(f64::NAN, 0.0, 0.0)));
        assert!(!is_finite_point(&Point3::new(0.0, f64::INFINITY, 0.0)));
    }
}
