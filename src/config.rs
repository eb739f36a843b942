//! Engine configuration.
//!
//! Every struct deserializes with `#[serde(default)]`, so a JSON document
//! only needs to name the values it overrides. Values are checked once by
//! [`EngineConfig::validate`] before anything is built.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::geometry::curve::CurveType;
use crate::material::MaterialParams;
use crate::reveal::RevealPolicy;
use crate::tessellation::max_tubular_segments;
use crate::viewport::BreakpointTable;

/// Shape and resolution of the track and its tube.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Tube cross-section radius.
    pub radius: f64,
    /// Segments around the tube cross-section.
    pub radial_segments: usize,
    /// Segments along the tube.
    pub tubular_segments: usize,
    /// Fraction of the visible extent covered by the straights.
    pub oval_width_scale: f64,
    /// Distance of each straight from the track center line.
    pub line_offset: f64,
    /// How far beyond the visible edge the primary strand starts.
    pub margin: f64,
    /// Samples taken along each semicircular turn.
    pub arc_segments: usize,
    /// Start the primary strand off screen at `extent / 2 + margin`.
    pub lead_in: bool,
    /// Build the mirrored secondary strand.
    pub dual_strand: bool,
    /// Depth offset of the secondary strand, keeping the tubes apart where
    /// they overlap.
    pub secondary_z_offset: f64,
    /// Interpolation used through the anchor points.
    pub curve_type: CurveType,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            radius: 0.25,
            radial_segments: 12,
            tubular_segments: 300,
            oval_width_scale: 0.5,
            line_offset: 2.0,
            margin: 5.0,
            arc_segments: 64,
            lead_in: true,
            dual_strand: true,
            secondary_z_offset: 0.01,
            curve_type: CurveType::default(),
        }
    }
}

impl GeometryConfig {
    /// Checks every value against its contract.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("radius", self.radius)?;
        positive("oval_width_scale", self.oval_width_scale)?;
        positive("line_offset", self.line_offset)?;
        at_least("radial_segments", self.radial_segments, 3)?;
        at_least("tubular_segments", self.tubular_segments, 1)?;
        at_most(
            "tubular_segments",
            self.tubular_segments,
            max_tubular_segments(self.radial_segments),
        )?;
        at_least("arc_segments", self.arc_segments, 1)?;
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(ConfigError::OutOfRange {
                field: "margin",
                value: self.margin,
                min: 0.0,
                max: f64::MAX,
            });
        }
        if !self.secondary_z_offset.is_finite() {
            return Err(ConfigError::OutOfRange {
                field: "secondary_z_offset",
                value: self.secondary_z_offset,
                min: f64::MIN,
                max: f64::MAX,
            });
        }
        if let CurveType::Uniform { tension } = self.curve_type {
            within("tension", tension, 0.0, 1.0)?;
        }
        Ok(())
    }
}

/// How the stop ratios of the two strands are derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopRatioMode {
    /// Each strand is sampled against its own threshold.
    #[default]
    Independent,
    /// The primary's ratio is reused for the secondary strand.
    Mirrored,
}

/// Timing of the reveal animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Progress gained per second.
    pub speed: f64,
    /// Largest frame delta honored, in seconds. Longer frames are clamped.
    pub max_frame_delta: f64,
    /// Which part of each strand is drawn for a given progress.
    pub policy: RevealPolicy,
    /// Fraction of the progress range the secondary strand waits before
    /// it starts.
    pub secondary_delay: f64,
    /// Parameter steps walked when locating stop points.
    pub stop_samples: usize,
    /// How the secondary strand's stop ratio is found.
    pub stop_ratio_mode: StopRatioMode,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            speed: 0.4,
            max_frame_delta: 0.05,
            policy: RevealPolicy::default(),
            secondary_delay: 0.0,
            stop_samples: 200,
            stop_ratio_mode: StopRatioMode::default(),
        }
    }
}

impl AnimationConfig {
    /// Checks every value against its contract.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("speed", self.speed)?;
        positive("max_frame_delta", self.max_frame_delta)?;
        at_least("stop_samples", self.stop_samples, 1)?;
        if !(0.0..1.0).contains(&self.secondary_delay) {
            return Err(ConfigError::OutOfRange {
                field: "secondary_delay",
                value: self.secondary_delay,
                min: 0.0,
                max: 1.0,
            });
        }
        if let RevealPolicy::SlidingWindow { window_length } = self.policy {
            within("window_length", window_length, 0.0, 1.0)?;
        }
        Ok(())
    }
}

/// Perspective camera looking straight at the track plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view, in degrees.
    pub fov_degrees: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self { fov_degrees: 60.0 }
    }
}

impl CameraConfig {
    /// Checks every value against its contract.
    ///
    /// # Errors
    ///
    /// Returns an error if the field of view is not strictly inside
    /// `(0, 180)` degrees.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fov_degrees.is_finite() || self.fov_degrees <= 0.0 || self.fov_degrees >= 180.0
        {
            return Err(ConfigError::OutOfRange {
                field: "fov_degrees",
                value: self.fov_degrees,
                min: 0.0,
                max: 180.0,
            });
        }
        Ok(())
    }

    /// Returns the vertical field of view in radians.
    #[must_use]
    pub fn fov_radians(&self) -> f64 {
        self.fov_degrees.to_radians()
    }
}

/// Complete configuration of a [`TrackEngine`](crate::engine::TrackEngine).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub geometry: GeometryConfig,
    pub animation: AnimationConfig,
    pub camera: CameraConfig,
    pub breakpoints: BreakpointTable,
    pub material: MaterialParams,
}

impl EngineConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or a value fails
    /// validation.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every section.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.geometry.validate()?;
        self.animation.validate()?;
        self.camera.validate()?;
        self.breakpoints.validate()?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn within(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

#[allow(clippy::cast_precision_loss)]
fn at_least(field: &'static str, value: usize, min: usize) -> Result<(), ConfigError> {
    if value >= min {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value: value as f64,
            min: min as f64,
            max: f64::MAX,
        })
    }
}

#[allow(clippy::cast_precision_loss)]
fn at_most(field: &'static str, value: usize, max: usize) -> Result<(), ConfigError> {
    if value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value: value as f64,
            min: 0.0,
            max: max as f64,
        })
    }
}
