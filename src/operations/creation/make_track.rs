use std::f64::consts::{FRAC_PI_2, PI};

use crate::config::GeometryConfig;
use crate::error::{GeometryError, Result};
use crate::geometry::curve::{Arc, CatmullRom};
use crate::geometry::TrackPaths;
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::operations::transform::{Mirror, Orientation};

/// Smallest visible extent a track is fitted to. A collapsed viewport is
/// widened to this instead of dividing by zero.
pub const MIN_VISIBLE_EXTENT: f64 = 1e-3;

/// Visible size of the track plane, in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackDimensions {
    /// Visible width at the track plane.
    pub visible_width: f64,
    /// Visible height at the track plane.
    pub visible_height: f64,
}

impl TrackDimensions {
    /// Creates new dimensions.
    #[must_use]
    pub fn new(visible_width: f64, visible_height: f64) -> Self {
        Self {
            visible_width,
            visible_height,
        }
    }
}

/// Builds the racetrack curves for a visible area.
///
/// The track is two parallel straights at `±line_offset` joined by
/// semicircular turns. The primary strand runs along the upper straight
/// toward the negative end, turns, and finishes halfway along the lower
/// straight. The secondary strand is its half-turn image about the track
/// center, so the two strands chase each other around the oval.
pub struct MakeTrack<'a> {
    dimensions: TrackDimensions,
    geometry: &'a GeometryConfig,
    orientation: Orientation,
}

impl<'a> MakeTrack<'a> {
    /// Creates a new `MakeTrack` operation.
    #[must_use]
    pub fn new(
        dimensions: TrackDimensions,
        geometry: &'a GeometryConfig,
        orientation: Orientation,
    ) -> Self {
        Self {
            dimensions,
            geometry,
            orientation,
        }
    }

    /// Executes the operation, returning the track curves.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are non-finite or the geometry
    /// configuration is invalid.
    pub fn execute(&self) -> Result<TrackPaths> {
        let TrackDimensions {
            visible_width,
            visible_height,
        } = self.dimensions;
        if !visible_width.is_finite() || !visible_height.is_finite() {
            return Err(GeometryError::NonFinite("track dimensions").into());
        }
        self.geometry.validate()?;

        let mut extent = self.orientation.along_extent(visible_width, visible_height);
        if extent < MIN_VISIBLE_EXTENT {
            tracing::debug!(extent, "visible extent collapsed, clamping");
            extent = MIN_VISIBLE_EXTENT;
        }

        let geometry = self.geometry;
        let turn_point = extent * geometry.oval_width_scale / 2.0;
        let top = geometry.line_offset;
        let bottom = -geometry.line_offset;
        let center = (top + bottom) / 2.0;
        let turn_radius = (top - bottom).abs() / 2.0;

        let local = self.local_points(extent, turn_point, top, bottom, center, turn_radius)?;

        let primary = local
            .iter()
            .map(|p| self.orientation.apply_point(p))
            .collect();
        let primary = CatmullRom::new(primary, false, geometry.curve_type)?;

        let secondary = if geometry.dual_strand {
            let mirrored = Mirror::new(&local, Point3::new(0.0, center, 0.0))
                .with_offset(Vector3::new(0.0, 0.0, geometry.secondary_z_offset))
                .execute()?;
            let points = mirrored
                .iter()
                .map(|p| self.orientation.apply_point(p))
                .collect();
            Some(CatmullRom::new(points, false, geometry.curve_type)?)
        } else {
            None
        };

        tracing::debug!(
            extent,
            turn_point,
            turn_radius,
            orientation = ?self.orientation,
            anchors = local.len(),
            dual = secondary.is_some(),
            "built track paths"
        );

        Ok(TrackPaths {
            primary,
            secondary,
            turn_point,
            turn_radius,
            extent,
            orientation: self.orientation,
        })
    }

    /// Anchor points of the primary strand in the local track frame.
    fn local_points(
        &self,
        extent: f64,
        turn_point: f64,
        top: f64,
        bottom: f64,
        center: f64,
        turn_radius: f64,
    ) -> Result<Vec<Point3>> {
        let geometry = self.geometry;
        let mut points = Vec::with_capacity(geometry.arc_segments + 4);

        // Enter from beyond the visible edge so the head appears from off screen.
        let lead = extent / 2.0 + geometry.margin;
        if geometry.lead_in && lead > turn_point + TOLERANCE {
            points.push(Point3::new(lead, top, 0.0));
        }

        points.push(Point3::new(turn_point, top, 0.0));
        points.push(Point3::new(-turn_point, top, 0.0));

        let turn = Arc::in_xy_plane(
            Point3::new(-turn_point, center, 0.0),
            turn_radius,
            FRAC_PI_2,
            FRAC_PI_2 + PI,
        )?;
        points.extend(turn.sample(geometry.arc_segments)?);

        points.push(Point3::new(0.0, bottom, 0.0));
        Ok(points)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::curve::Curve;
    use crate::geometry::Strand;
    use crate::math::Axis;

    fn geometry() -> GeometryConfig {
        GeometryConfig::default()
    }

    fn build(width: f64, height: f64, orientation: Orientation) -> TrackPaths {
        let geometry = geometry();
        MakeTrack::new(TrackDimensions::new(width, height), &geometry, orientation)
            .execute()
            .unwrap()
    }

    #[test]
    fn turn_point_and_radius_from_dimensions() {
        let paths = build(10.0, 6.0, Orientation::Horizontal);
        assert_relative_eq!(paths.turn_point, 2.5);
        assert_relative_eq!(paths.turn_radius, 2.0);
        assert_relative_eq!(paths.extent, 10.0);
    }

    #[test]
    fn primary_starts_off_screen_and_ends_mid_bottom() {
        let paths = build(10.0, 6.0, Orientation::Horizontal);
        let points = paths.primary.points();

        // extent / 2 + margin
        assert_relative_eq!(points[0], Point3::new(10.0, 2.0, 0.0));
        assert_relative_eq!(points[1], Point3::new(2.5, 2.0, 0.0));
        assert_relative_eq!(points[2], Point3::new(-2.5, 2.0, 0.0));

        let end = paths.primary.evaluate(1.0).unwrap();
        assert_relative_eq!(end, Point3::new(0.0, -2.0, 0.0), epsilon = 1e-12);
        // lead-in + two straight anchors + 64 arc samples + closing anchor
        assert_eq!(points.len(), 68);
    }

    #[test]
    fn turn_samples_lie_on_the_turn_circle() {
        let paths = build(10.0, 6.0, Orientation::Horizontal);
        let center = Point3::new(-2.5, 0.0, 0.0);
        for p in &paths.primary.points()[3..67] {
            assert_relative_eq!((p - center).norm(), 2.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn secondary_is_half_turn_of_primary() {
        let paths = build(10.0, 6.0, Orientation::Horizontal);
        let secondary = paths.secondary.as_ref().unwrap();
        let z = GeometryConfig::default().secondary_z_offset;
        for (a, b) in paths.primary.points().iter().zip(secondary.points()) {
            assert_relative_eq!(b.x, -a.x, epsilon = 1e-12);
            assert_relative_eq!(b.y, -a.y, epsilon = 1e-12);
            assert_relative_eq!(b.z, z, epsilon = 1e-12);
        }
    }

    #[test]
    fn vertical_orientation_uses_height_and_swaps_axes() {
        let paths = build(4.0, 12.0, Orientation::Vertical);
        assert_relative_eq!(paths.turn_point, 3.0);
        let points = paths.primary.points();
        assert_relative_eq!(points[1], Point3::new(2.0, 3.0, 0.0));
        assert_relative_eq!(points[2], Point3::new(2.0, -3.0, 0.0));
        assert_eq!(paths.stop_threshold(Strand::Primary), (Axis::Y, 3.0));
    }

    #[test]
    fn lead_in_can_be_disabled() {
        let geometry = GeometryConfig {
            lead_in: false,
            ..GeometryConfig::default()
        };
        let paths = MakeTrack::new(
            TrackDimensions::new(10.0, 6.0),
            &geometry,
            Orientation::Horizontal,
        )
        .execute()
        .unwrap();
        assert_relative_eq!(paths.primary.points()[0], Point3::new(2.5, 2.0, 0.0));
    }

    #[test]
    fn single_strand_layout() {
        let geometry = GeometryConfig {
            dual_strand: false,
            ..GeometryConfig::default()
        };
        let paths = MakeTrack::new(
            TrackDimensions::new(10.0, 6.0),
            &geometry,
            Orientation::Horizontal,
        )
        .execute()
        .unwrap();
        assert!(paths.secondary.is_none());
        assert_eq!(paths.strands().count(), 1);
    }

    #[test]
    fn collapsed_viewport_is_clamped() {
        let paths = build(0.0, 0.0, Orientation::Horizontal);
        assert_relative_eq!(paths.extent, MIN_VISIBLE_EXTENT);
        assert!(paths.turn_point > 0.0);
        assert!(paths.primary.evaluate(0.5).unwrap().x.is_finite());
    }

    #[test]
    fn non_finite_dimensions_fail() {
        let geometry = geometry();
        let result = MakeTrack::new(
            TrackDimensions::new(f64::NAN, 6.0),
            &geometry,
            Orientation::Horizontal,
        )
        .execute();
        assert!(result.is_err());
    }

    #[test]
    fn zero_line_offset_fails() {
        let geometry = GeometryConfig {
            line_offset: 0.0,
            ..GeometryConfig::default()
        };
        let result = MakeTrack::new(
            TrackDimensions::new(10.0, 6.0),
            &geometry,
            Orientation::Horizontal,
        )
        .execute();
        assert!(result.is_err());
    }
}
