use std::f64::consts::TAU;

use crate::error::{Result, TessellationError};
use crate::geometry::curve::{ArcLengthTable, Curve, DEFAULT_DIVISIONS};
use crate::math::{Point2, Point3, Vector3};

use super::frames::{FrameSet, TransportFrames};
use super::tube_style::TubeStyle;
use super::{DrawRange, TriangleMesh};

/// A tube mesh with a fixed index buffer and a settable visible range.
///
/// Indices are laid out one longitudinal segment after another, so every
/// range that starts and ends on a multiple of [`TubeMesh::ring_step`]
/// covers a contiguous length of the tube.
#[derive(Debug, Clone)]
pub struct TubeMesh {
    mesh: TriangleMesh,
    style: TubeStyle,
    closed: bool,
    visible: DrawRange,
}

impl TubeMesh {
    /// Returns the underlying triangle mesh.
    #[must_use]
    pub fn mesh(&self) -> &TriangleMesh {
        &self.mesh
    }

    /// Returns the style the tube was built with.
    #[must_use]
    pub fn style(&self) -> &TubeStyle {
        &self.style
    }

    /// Returns whether the tube wraps around a closed curve.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Total number of scalar indices. Fixed for the lifetime of the mesh.
    #[must_use]
    pub fn index_count(&self) -> usize {
        self.mesh.index_count()
    }

    /// Number of indices per longitudinal segment.
    #[must_use]
    pub fn ring_step(&self) -> usize {
        self.style.ring_step()
    }

    /// Sets which indices are drawn, clamping into the index buffer.
    ///
    /// Returns the range actually applied.
    pub fn set_visible_range(&mut self, start: usize, count: usize) -> DrawRange {
        self.visible = DrawRange::new(start, count).clamped(self.index_count());
        self.visible
    }

    /// Returns the visible range.
    #[must_use]
    pub fn visible_range(&self) -> DrawRange {
        self.visible
    }

    /// Iterates over the visible part of the flat index buffer.
    pub fn visible_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.mesh
            .flat_indices()
            .skip(self.visible.start)
            .take(self.visible.count)
    }

    /// Returns the triangles fully covered by the visible range.
    #[must_use]
    pub fn visible_triangles(&self) -> &[[u32; 3]] {
        let first = self.visible.start.div_ceil(3);
        let last = (self.visible.end() / 3).max(first);
        &self.mesh.indices[first..last]
    }
}

/// Extrudes a circular cross-section along a curve.
///
/// Rings are placed at `tubular_segments + 1` equal arc-length steps with
/// rotation-minimizing frames. Each ring holds `radial_segments + 1`
/// vertices; the seam vertex is duplicated so uvs stay continuous. For
/// closed curves the last ring reuses the first frame so the tube joins up.
pub struct TessellateTube<'a, C: Curve + ?Sized> {
    curve: &'a C,
    style: TubeStyle,
    divisions: usize,
}

impl<'a, C: Curve + ?Sized> TessellateTube<'a, C> {
    /// Creates a new tube tessellation operation.
    #[must_use]
    pub fn new(curve: &'a C, style: TubeStyle) -> Self {
        Self {
            curve,
            style,
            divisions: DEFAULT_DIVISIONS,
        }
    }

    /// Sets the arc-length table resolution used to space the rings.
    #[must_use]
    pub fn with_divisions(mut self, divisions: usize) -> Self {
        self.divisions = divisions;
        self
    }

    /// Executes the tessellation, producing a tube mesh with everything visible.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve is degenerate or the vertex count
    /// exceeds the 32-bit index space.
    pub fn execute(&self) -> Result<TubeMesh> {
        let tubular = self.style.tubular_segments();
        let radial = self.style.radial_segments();
        let ring_len = radial + 1;

        let vertex_count = tubular
            .checked_add(1)
            .and_then(|rings| rings.checked_mul(ring_len))
            .filter(|&count| u32::try_from(count).is_ok())
            .ok_or_else(|| {
                TessellationError::InvalidParameters(format!(
                    "{tubular} x {radial} segments exceed the index range"
                ))
            })?;

        let table = ArcLengthTable::new(self.curve, self.divisions)?;
        let frames = TransportFrames::new(self.curve, &table, tubular).execute()?;
        let closed = self.curve.is_closed();

        let mut mesh = TriangleMesh {
            vertices: Vec::with_capacity(vertex_count),
            normals: Vec::with_capacity(vertex_count),
            uvs: Vec::with_capacity(vertex_count),
            indices: Vec::with_capacity(tubular.saturating_mul(radial).saturating_mul(2)),
        };

        #[allow(clippy::cast_precision_loss)]
        let steps = tubular as f64;
        for i in 0..tubular {
            #[allow(clippy::cast_precision_loss)]
            let u = i as f64 / steps;
            let center = table.point_at(self.curve, u)?;
            self.push_ring(&mut mesh, center, &frames, i);
        }
        // The closing ring: either the curve end, or the start again.
        let last = if closed { 0 } else { tubular };
        #[allow(clippy::cast_precision_loss)]
        let center = table.point_at(self.curve, last as f64 / steps)?;
        self.push_ring(&mut mesh, center, &frames, last);

        for i in 0..=tubular {
            for j in 0..=radial {
                #[allow(clippy::cast_precision_loss)]
                let uv = Point2::new(i as f64 / steps, j as f64 / radial as f64);
                mesh.uvs.push(uv);
            }
        }

        #[allow(clippy::cast_possible_truncation)]
        let stride = ring_len as u32;
        for j in 1..=tubular {
            for i in 1..=radial {
                #[allow(clippy::cast_possible_truncation)]
                let (j, i) = (j as u32, i as u32);
                let a = stride * (j - 1) + (i - 1);
                let b = stride * j + (i - 1);
                let c = stride * j + i;
                let d = stride * (j - 1) + i;
                mesh.indices.push([a, b, d]);
                mesh.indices.push([b, c, d]);
            }
        }

        tracing::trace!(
            vertices = mesh.vertices.len(),
            indices = mesh.index_count(),
            closed,
            "tessellated tube"
        );

        let visible = DrawRange::new(0, mesh.index_count());
        Ok(TubeMesh {
            mesh,
            style: self.style,
            closed,
            visible,
        })
    }

    /// Appends one ring of vertices around `center` using frame `frame`.
    fn push_ring(&self, mesh: &mut TriangleMesh, center: Point3, frames: &FrameSet, frame: usize) {
        let radial = self.style.radial_segments();
        let normal = frames.normals[frame];
        let binormal = frames.binormals[frame];

        #[allow(clippy::cast_precision_loss)]
        let count = radial as f64;
        for j in 0..=radial {
            #[allow(clippy::cast_precision_loss)]
            let angle = j as f64 / count * TAU;
            let sin = angle.sin();
            let cos = -angle.cos();
            let outward: Vector3 = (normal * cos + binormal * sin).normalize();
            mesh.normals.push(outward);
            mesh.vertices.push(center + outward * self.style.radius());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::geometry::curve::{CatmullRom, CurveType};

    fn straight() -> CatmullRom {
        CatmullRom::open(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
        ])
        .unwrap()
    }

    fn square() -> CatmullRom {
        CatmullRom::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(4.0, 0.0, 0.0),
                Point3::new(4.0, 4.0, 0.0),
                Point3::new(0.0, 4.0, 0.0),
            ],
            true,
            CurveType::Centripetal,
        )
        .unwrap()
    }

    #[test]
    fn index_count_is_fixed_by_style() {
        let style = TubeStyle::new(0.25, 12, 300).unwrap();
        let tube = TessellateTube::new(&straight(), style).execute().unwrap();
        assert_eq!(tube.index_count(), 300 * 12 * 6);
        assert_eq!(tube.mesh().vertices.len(), 301 * 13);
        assert_eq!(tube.mesh().uvs.len(), tube.mesh().vertices.len());
        assert_eq!(tube.visible_range(), DrawRange::new(0, 21_600));
    }

    #[test]
    fn vertices_sit_on_the_radius() {
        let style = TubeStyle::new(0.5, 8, 10).unwrap();
        let tube = TessellateTube::new(&straight(), style).execute().unwrap();
        for v in &tube.mesh().vertices {
            let off_axis = (v.y * v.y + v.z * v.z).sqrt();
            assert_relative_eq!(off_axis, 0.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn rings_are_evenly_spaced_along_length() {
        let curve = CatmullRom::open(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
        ])
        .unwrap();
        let style = TubeStyle::new(0.1, 4, 10).unwrap();
        let tube = TessellateTube::new(&curve, style).execute().unwrap();
        // First vertex of each ring shares the ring center's x coordinate.
        for ring in 0..=10 {
            let x = tube.mesh().vertices[ring * 5].x;
            assert_relative_eq!(x, f64::from(u32::try_from(ring).unwrap()), epsilon = 0.05);
        }
    }

    #[test]
    fn segment_ranges_are_contiguous() {
        let style = TubeStyle::new(0.25, 6, 20).unwrap();
        let tube = TessellateTube::new(&straight(), style).execute().unwrap();
        let step = tube.ring_step();
        let stride = 7;
        let flat: Vec<u32> = tube.mesh().flat_indices().collect();

        for segment in 0..20 {
            let lo = u32::try_from(segment * stride).unwrap();
            let hi = u32::try_from((segment + 2) * stride).unwrap();
            for &index in &flat[segment * step..(segment + 1) * step] {
                assert!(index >= lo && index < hi);
            }
        }
    }

    #[test]
    fn closed_curve_joins_last_ring_to_first() {
        let style = TubeStyle::new(0.2, 8, 40).unwrap();
        let tube = TessellateTube::new(&square(), style).execute().unwrap();
        assert!(tube.is_closed());
        let vertices = &tube.mesh().vertices;
        let last_ring = 40 * 9;
        for j in 0..9 {
            assert_relative_eq!(vertices[j], vertices[last_ring + j], epsilon = 1e-9);
        }
    }

    #[test]
    fn visible_range_is_clamped() {
        let style = TubeStyle::new(0.25, 4, 10).unwrap();
        let mut tube = TessellateTube::new(&straight(), style).execute().unwrap();
        let total = tube.index_count();

        let applied = tube.set_visible_range(total - 24, 1000);
        assert_eq!(applied, DrawRange::new(total - 24, 24));

        let applied = tube.set_visible_range(total + 10, 5);
        assert_eq!(applied, DrawRange::new(total, 0));
        assert_eq!(tube.visible_indices().count(), 0);

        tube.set_visible_range(24, 48);
        assert_eq!(tube.visible_indices().count(), 48);
        assert_eq!(tube.visible_triangles().len(), 16);
        assert_eq!(tube.visible_triangles()[0], tube.mesh().indices[8]);
    }
}
