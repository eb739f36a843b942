use crate::config::GeometryConfig;
use crate::error::{Result, TessellationError};

/// Smallest cross-section that still encloses area.
const MIN_RADIAL_SEGMENTS: usize = 3;

/// Largest `tubular_segments` whose vertices stay addressable by `u32`
/// indices when each ring holds `radial_segments + 1` vertices.
#[must_use]
pub fn max_tubular_segments(radial_segments: usize) -> usize {
    let index_space = usize::try_from(u32::MAX).unwrap_or(usize::MAX);
    (index_space / radial_segments.saturating_add(1)).saturating_sub(1)
}

/// Cross-section and resolution of a tube mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TubeStyle {
    radius: f64,
    radial_segments: usize,
    tubular_segments: usize,
}

impl TubeStyle {
    /// Creates a new tube style.
    ///
    /// # Errors
    ///
    /// Returns an error if `radius` is not finite and positive, fewer than
    /// three radial segments are requested, `tubular_segments` is zero, or
    /// the vertices would not fit 32-bit indices.
    pub fn new(radius: f64, radial_segments: usize, tubular_segments: usize) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(TessellationError::InvalidParameters(
                "tube radius must be positive".to_owned(),
            )
            .into());
        }
        if radial_segments < MIN_RADIAL_SEGMENTS {
            return Err(TessellationError::InvalidParameters(format!(
                "tube needs at least {MIN_RADIAL_SEGMENTS} radial segments, got {radial_segments}"
            ))
            .into());
        }
        if tubular_segments == 0 {
            return Err(TessellationError::InvalidParameters(
                "tube needs at least one tubular segment".to_owned(),
            )
            .into());
        }
        let max_tubular = max_tubular_segments(radial_segments);
        if tubular_segments > max_tubular {
            return Err(TessellationError::InvalidParameters(format!(
                "{tubular_segments} tubular segments exceed the index range, at most {max_tubular} fit"
            ))
            .into());
        }
        Ok(Self {
            radius,
            radial_segments,
            tubular_segments,
        })
    }

    /// Creates the tube style described by a geometry configuration.
    ///
    /// # Errors
    ///
    /// See [`TubeStyle::new`].
    pub fn from_geometry(geometry: &GeometryConfig) -> Result<Self> {
        Self::new(
            geometry.radius,
            geometry.radial_segments,
            geometry.tubular_segments,
        )
    }

    /// Returns the tube radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the number of segments around the cross-section.
    #[must_use]
    pub fn radial_segments(&self) -> usize {
        self.radial_segments
    }

    /// Returns the number of segments along the tube.
    #[must_use]
    pub fn tubular_segments(&self) -> usize {
        self.tubular_segments
    }

    /// Number of indices covering one longitudinal segment: one ring of quads,
    /// two triangles each.
    #[must_use]
    pub fn ring_step(&self) -> usize {
        self.radial_segments * 6
    }

    /// Number of vertices: one ring of `radial_segments + 1` per step,
    /// including both ends.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        (self.tubular_segments + 1) * (self.radial_segments + 1)
    }

    /// Total number of indices of a tube with this style.
    #[must_use]
    pub fn index_count(&self) -> usize {
        self.tubular_segments * self.ring_step()
    }
}
