use serde::{Deserialize, Serialize};

use crate::math::{Axis, Point3};

/// Maps the local track frame onto world coordinates.
///
/// Tracks are laid out in a local frame where `along` runs parallel to the
/// straights and `across` separates them. `Horizontal` uses that frame
/// as-is; `Vertical` swaps the two axes so the straights run up and down,
/// which suits narrow portrait viewports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Returns the world point for local coordinates `(along, across)` at depth `z`.
    #[must_use]
    pub fn apply(self, along: f64, across: f64, z: f64) -> Point3 {
        match self {
            Self::Horizontal => Point3::new(along, across, z),
            Self::Vertical => Point3::new(across, along, z),
        }
    }

    /// Maps an already built local point into world coordinates.
    #[must_use]
    pub fn apply_point(self, local: &Point3) -> Point3 {
        self.apply(local.x, local.y, local.z)
    }

    /// Returns the world axis the straights run along.
    #[must_use]
    pub fn along_axis(self) -> Axis {
        match self {
            Self::Horizontal => Axis::X,
            Self::Vertical => Axis::Y,
        }
    }

    /// Picks the extent the straights are fitted to from a visible width and height.
    #[must_use]
    pub fn along_extent(self, width: f64, height: f64) -> f64 {
        match self {
            Self::Horizontal => width,
            Self::Vertical => height,
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn horizontal_keeps_coordinates() {
        let p = Orientation::Horizontal.apply(2.5, 2.0, 0.1);
        assert_eq!(p, Point3::new(2.5, 2.0, 0.1));
        assert_eq!(Orientation::Horizontal.along_axis(), Axis::X);
    }

    #[test]
    fn vertical_swaps_axes() {
        let p = Orientation::Vertical.apply(2.5, 2.0, 0.0);
        assert_eq!(p, Point3::new(2.0, 2.5, 0.0));
        assert_eq!(Orientation::Vertical.along_axis(), Axis::Y);
    }

    #[test]
    fn along_extent_follows_axis() {
        assert_eq!(Orientation::Horizontal.along_extent(16.0, 9.0), 16.0);
        assert_eq!(Orientation::Vertical.along_extent(9.0, 16.0), 16.0);
    }
}
