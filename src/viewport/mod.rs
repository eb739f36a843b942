//! Maps viewport sizes onto camera placement and track dimensions.

use serde::{Deserialize, Serialize};

use crate::config::CameraConfig;
use crate::error::ConfigError;
use crate::operations::creation::TrackDimensions;
use crate::operations::transform::Orientation;

/// Device class selected by viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Mobile,
    Tablet,
    Desktop,
    Ultrawide,
}

/// Size of the render surface, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    /// Creates a surface size of at least one pixel in each direction.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Rounds a non-negative viewport size to whole pixels, clamping a
    /// collapsed side to one pixel.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn from_viewport(width: f64, height: f64) -> Self {
        let px = |v: f64| v.round().clamp(1.0, f64::from(u32::MAX)) as u32;
        Self::new(px(width), px(height))
    }

    /// Width divided by height.
    #[must_use]
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Layout used for viewports narrower than `max_width`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub tier: Tier,
    /// Exclusive upper bound on the viewport width. `None` matches any width.
    #[serde(default)]
    pub max_width: Option<f64>,
    /// Fixed render-surface size. `None` follows the viewport.
    #[serde(default)]
    pub surface: Option<SurfaceSize>,
    /// Distance from the camera to the track plane.
    pub camera_distance: f64,
    #[serde(default)]
    pub orientation: Orientation,
}

/// Breakpoints ordered by ascending `max_width`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BreakpointTable {
    breakpoints: Vec<Breakpoint>,
}

impl Default for BreakpointTable {
    fn default() -> Self {
        let tier = |tier, max_width, camera_distance, orientation| Breakpoint {
            tier,
            max_width,
            surface: None,
            camera_distance,
            orientation,
        };
        Self {
            breakpoints: vec![
                tier(Tier::Mobile, Some(640.0), 14.0, Orientation::Vertical),
                tier(Tier::Tablet, Some(1024.0), 13.0, Orientation::Horizontal),
                tier(Tier::Desktop, Some(1920.0), 12.0, Orientation::Horizontal),
                tier(Tier::Ultrawide, None, 11.0, Orientation::Horizontal),
            ],
        }
    }
}

impl BreakpointTable {
    /// Creates a table from breakpoints in ascending width order.
    ///
    /// # Errors
    ///
    /// Returns an error if the table fails [`BreakpointTable::validate`].
    pub fn new(breakpoints: Vec<Breakpoint>) -> Result<Self, ConfigError> {
        let table = Self { breakpoints };
        table.validate()?;
        Ok(table)
    }

    /// Returns the breakpoints.
    #[must_use]
    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    /// Checks that the table is non-empty, strictly ascending, unbounded
    /// only in its last entry, and places the camera in front of the track.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Breakpoints`] describing the first problem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.breakpoints.is_empty() {
            return Err(ConfigError::Breakpoints("no breakpoints".into()));
        }
        let last = self.breakpoints.len() - 1;
        let mut previous = 0.0;
        for (i, breakpoint) in self.breakpoints.iter().enumerate() {
            let distance = breakpoint.camera_distance;
            if !distance.is_finite() || distance <= 0.0 {
                return Err(ConfigError::Breakpoints(format!(
                    "{:?}: camera distance must be positive, got {distance}",
                    breakpoint.tier
                )));
            }
            if let Some(surface) = breakpoint.surface {
                if surface.width == 0 || surface.height == 0 {
                    return Err(ConfigError::Breakpoints(format!(
                        "{:?}: surface must be at least 1x1",
                        breakpoint.tier
                    )));
                }
            }
            match breakpoint.max_width {
                Some(max) if !max.is_finite() || max <= previous => {
                    return Err(ConfigError::Breakpoints(format!(
                        "{:?}: max width {max} does not ascend past {previous}",
                        breakpoint.tier
                    )));
                }
                Some(max) => previous = max,
                None if i != last => {
                    return Err(ConfigError::Breakpoints(format!(
                        "{:?}: only the last breakpoint may be unbounded",
                        breakpoint.tier
                    )));
                }
                None => {}
            }
        }
        Ok(())
    }

    /// Returns the first breakpoint narrower than `width` allows, or the
    /// widest one when every bound is exceeded.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is empty.
    pub fn select(&self, width: f64) -> Result<&Breakpoint, ConfigError> {
        self.breakpoints
            .iter()
            .find(|breakpoint| !matches!(breakpoint.max_width, Some(max) if width >= max))
            .or_else(|| self.breakpoints.last())
            .ok_or_else(|| ConfigError::Breakpoints("no breakpoints".into()))
    }
}

/// Everything a viewport size decides about the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportResolution {
    pub tier: Tier,
    pub surface: SurfaceSize,
    pub camera_distance: f64,
    pub orientation: Orientation,
    /// Extent of the track plane seen by the camera.
    pub visible: TrackDimensions,
}

/// Tracks the viewport and reports when the track has to be rebuilt.
#[derive(Debug, Clone)]
pub struct ViewportAdapter {
    camera: CameraConfig,
    breakpoints: BreakpointTable,
    viewport: Option<(f64, f64)>,
    current: Option<ViewportResolution>,
}

impl ViewportAdapter {
    /// Creates an adapter that has not seen a viewport yet.
    #[must_use]
    pub fn new(camera: CameraConfig, breakpoints: BreakpointTable) -> Self {
        Self {
            camera,
            breakpoints,
            viewport: None,
            current: None,
        }
    }

    /// Returns the last committed resolution.
    #[must_use]
    pub fn current(&self) -> Option<&ViewportResolution> {
        self.current.as_ref()
    }

    /// Resolves a viewport size without recording it.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is not finite or is negative.
    /// A zero dimension is accepted and clamped to one pixel.
    pub fn resolve(&self, width: f64, height: f64) -> Result<ViewportResolution, ConfigError> {
        if !width.is_finite() || !height.is_finite() {
            return Err(ConfigError::NonFiniteViewport { width, height });
        }
        if width < 0.0 || height < 0.0 {
            return Err(ConfigError::NegativeViewport { width, height });
        }
        let breakpoint = self.breakpoints.select(width)?;
        let surface = breakpoint
            .surface
            .unwrap_or_else(|| SurfaceSize::from_viewport(width, height));

        let visible_height =
            2.0 * (self.camera.fov_radians() / 2.0).tan() * breakpoint.camera_distance;
        let visible_width = visible_height * surface.aspect();

        Ok(ViewportResolution {
            tier: breakpoint.tier,
            surface,
            camera_distance: breakpoint.camera_distance,
            orientation: breakpoint.orientation,
            visible: TrackDimensions::new(visible_width, visible_height),
        })
    }

    /// Resolves a viewport size and compares it with the committed one.
    ///
    /// Returns the new resolution when the size or tier changed, or `None`
    /// when nothing needs rebuilding. Nothing is recorded until
    /// [`ViewportAdapter::commit`].
    ///
    /// # Errors
    ///
    /// See [`ViewportAdapter::resolve`].
    pub fn changed(
        &self,
        width: f64,
        height: f64,
    ) -> Result<Option<ViewportResolution>, ConfigError> {
        let resolution = self.resolve(width, height)?;
        #[allow(clippy::float_cmp)]
        let same_size = self.viewport == Some((width, height));
        let same_tier = self.current.is_some_and(|current| current.tier == resolution.tier);
        if same_size && same_tier {
            return Ok(None);
        }
        Ok(Some(resolution))
    }

    /// Records `resolution` as the one built for a `width` x `height`
    /// viewport.
    pub fn commit(&mut self, width: f64, height: f64, resolution: ViewportResolution) {
        tracing::debug!(
            width,
            height,
            tier = ?resolution.tier,
            "viewport changed"
        );
        self.viewport = Some((width, height));
        self.current = Some(resolution);
    }

    /// Resolves and commits a viewport size in one step.
    ///
    /// Returns the new resolution when the size or tier changed.
    ///
    /// # Errors
    ///
    /// See [`ViewportAdapter::resolve`].
    pub fn update(
        &mut self,
        width: f64,
        height: f64,
    ) -> Result<Option<ViewportResolution>, ConfigError> {
        let changed = self.changed(width, height)?;
        if let Some(resolution) = changed {
            self.commit(width, height, resolution);
        }
        Ok(changed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn adapter() -> ViewportAdapter {
        ViewportAdapter::new(CameraConfig::default(), BreakpointTable::default())
    }

    #[test]
    fn default_table_is_valid() {
        BreakpointTable::default().validate().unwrap();
    }

    #[test]
    fn tiers_follow_width() {
        let table = BreakpointTable::default();
        assert_eq!(table.select(320.0).unwrap().tier, Tier::Mobile);
        assert_eq!(table.select(640.0).unwrap().tier, Tier::Tablet);
        assert_eq!(table.select(1280.0).unwrap().tier, Tier::Desktop);
        assert_eq!(table.select(3440.0).unwrap().tier, Tier::Ultrawide);
    }

    #[test]
    fn bounded_table_falls_back_to_widest() {
        let table = BreakpointTable::new(vec![Breakpoint {
            tier: Tier::Desktop,
            max_width: Some(800.0),
            surface: None,
            camera_distance: 10.0,
            orientation: Orientation::Horizontal,
        }])
        .unwrap();
        assert_eq!(table.select(5000.0).unwrap().tier, Tier::Desktop);
    }

    #[test]
    fn rejects_descending_widths() {
        let mut breakpoints = BreakpointTable::default().breakpoints().to_vec();
        breakpoints.swap(0, 1);
        assert!(BreakpointTable::new(breakpoints).is_err());
    }

    #[test]
    fn rejects_unbounded_middle_entry() {
        let mut breakpoints = BreakpointTable::default().breakpoints().to_vec();
        breakpoints[1].max_width = None;
        assert!(BreakpointTable::new(breakpoints).is_err());
    }

    #[test]
    fn rejects_empty_table() {
        assert!(BreakpointTable::new(Vec::new()).is_err());
    }

    #[test]
    fn visible_extent_follows_camera() {
        let resolution = adapter().resolve(1280.0, 720.0).unwrap();
        // 60 degree fov at distance 12.
        let expected_height = 2.0 * (30.0_f64).to_radians().tan() * 12.0;
        assert_relative_eq!(resolution.visible.visible_height, expected_height, epsilon = 1e-9);
        assert_relative_eq!(
            resolution.visible.visible_width,
            expected_height * 1280.0 / 720.0,
            epsilon = 1e-9
        );
        assert_eq!(resolution.orientation, Orientation::Horizontal);
    }

    #[test]
    fn mobile_is_vertical() {
        let resolution = adapter().resolve(390.0, 844.0).unwrap();
        assert_eq!(resolution.tier, Tier::Mobile);
        assert_eq!(resolution.orientation, Orientation::Vertical);
        assert_relative_eq!(resolution.camera_distance, 14.0);
    }

    #[test]
    fn pinned_surface_overrides_viewport() {
        let table = BreakpointTable::new(vec![Breakpoint {
            tier: Tier::Desktop,
            max_width: None,
            surface: Some(SurfaceSize::new(800, 400)),
            camera_distance: 10.0,
            orientation: Orientation::Horizontal,
        }])
        .unwrap();
        let adapter = ViewportAdapter::new(CameraConfig::default(), table);
        let resolution = adapter.resolve(1920.0, 1080.0).unwrap();
        assert_eq!(resolution.surface, SurfaceSize::new(800, 400));
        assert_relative_eq!(
            resolution.visible.visible_width,
            resolution.visible.visible_height * 2.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn collapsed_viewport_clamps_to_one_pixel() {
        let resolution = adapter().resolve(0.0, 0.0).unwrap();
        assert_eq!(resolution.surface, SurfaceSize::new(1, 1));
        assert!(resolution.visible.visible_width > 0.0);
    }

    #[test]
    fn negative_viewport_is_rejected() {
        assert!(matches!(
            adapter().resolve(0.0, -5.0),
            Err(ConfigError::NegativeViewport { .. })
        ));
        assert!(matches!(
            adapter().resolve(-1280.0, -720.0),
            Err(ConfigError::NegativeViewport { .. })
        ));
    }

    #[test]
    fn non_finite_viewport_is_rejected() {
        assert!(matches!(
            adapter().resolve(f64::NAN, 600.0),
            Err(ConfigError::NonFiniteViewport { .. })
        ));
        assert!(adapter().resolve(800.0, f64::INFINITY).is_err());
    }

    #[test]
    fn update_reports_only_changes() {
        let mut adapter = adapter();
        assert!(adapter.update(1280.0, 720.0).unwrap().is_some());
        assert!(adapter.update(1280.0, 720.0).unwrap().is_none());
        let changed = adapter.update(500.0, 720.0).unwrap().unwrap();
        assert_eq!(changed.tier, Tier::Mobile);
        assert_eq!(adapter.current().unwrap().tier, Tier::Mobile);
    }

    #[test]
    fn changed_does_not_commit() {
        let mut adapter = adapter();
        adapter.update(1280.0, 720.0).unwrap();
        let pending = adapter.changed(500.0, 720.0).unwrap().unwrap();
        assert_eq!(pending.tier, Tier::Mobile);
        assert_eq!(adapter.current().unwrap().tier, Tier::Desktop);
        assert!(adapter.changed(500.0, 720.0).unwrap().is_some());

        adapter.commit(500.0, 720.0, pending);
        assert!(adapter.changed(500.0, 720.0).unwrap().is_none());
    }

    #[test]
    fn breakpoints_deserialize_as_list() {
        let table: BreakpointTable = serde_json::from_str(
            r#"[
                { "tier": "mobile", "max_width": 700, "camera_distance": 15, "orientation": "vertical" },
                { "tier": "desktop", "camera_distance": 12, "surface": { "width": 1600, "height": 900 } }
            ]"#,
        )
        .unwrap();
        table.validate().unwrap();
        assert_eq!(table.select(699.0).unwrap().orientation, Orientation::Vertical);
        assert_eq!(
            table.select(701.0).unwrap().surface,
            Some(SurfaceSize::new(1600, 900))
        );
    }
}
