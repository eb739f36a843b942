use nalgebra::Unit;

use crate::error::{GeometryError, Result};
use crate::geometry::curve::{ArcLengthTable, Curve};
use crate::math::{Rotation3, Vector3, TOLERANCE};

/// Orthonormal frames sampled along a curve.
#[derive(Debug, Clone, Default)]
pub struct FrameSet {
    /// Unit tangents.
    pub tangents: Vec<Vector3>,
    /// Unit normals, perpendicular to the tangents.
    pub normals: Vec<Vector3>,
    /// Unit binormals, `tangent × normal`.
    pub binormals: Vec<Vector3>,
}

impl FrameSet {
    /// Returns the number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tangents.len()
    }

    /// Returns `true` if there are no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tangents.is_empty()
    }
}

/// Computes rotation-minimizing frames by parallel transport.
///
/// Frames are placed at `segments + 1` equal arc-length steps. The first
/// normal is perpendicular to the tangent and to the world axis the tangent
/// is least aligned with; each following normal is the previous one rotated
/// by the turn between consecutive tangents, so the cross-section does not
/// twist. On closed curves the residual twist between the last and first
/// frame is spread evenly along the curve.
pub struct TransportFrames<'a, C: Curve + ?Sized> {
    curve: &'a C,
    table: &'a ArcLengthTable,
    segments: usize,
}

impl<'a, C: Curve + ?Sized> TransportFrames<'a, C> {
    /// Creates a new `TransportFrames` operation.
    #[must_use]
    pub fn new(curve: &'a C, table: &'a ArcLengthTable, segments: usize) -> Self {
        Self {
            curve,
            table,
            segments,
        }
    }

    /// Executes the operation, returning `segments + 1` frames.
    ///
    /// # Errors
    ///
    /// Returns an error if `segments` is zero or a tangent is degenerate.
    pub fn execute(&self) -> Result<FrameSet> {
        if self.segments == 0 {
            return Err(
                GeometryError::Degenerate("frames need at least one segment".into()).into(),
            );
        }

        #[allow(clippy::cast_precision_loss)]
        let steps = self.segments as f64;
        let tangents = (0..=self.segments)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let u = i as f64 / steps;
                self.table.tangent_at(self.curve, u)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut normals = Vec::with_capacity(tangents.len());
        let mut binormals = Vec::with_capacity(tangents.len());

        let first = tangents[0];
        let side = first.cross(&least_aligned_axis(&first));
        let side = Unit::try_new(side, TOLERANCE)
            .ok_or(GeometryError::ZeroVector)?
            .into_inner();
        let normal = first.cross(&side);
        normals.push(normal);
        binormals.push(first.cross(&normal));

        for i in 1..tangents.len() {
            let mut normal = normals[i - 1];
            let turn = tangents[i - 1].cross(&tangents[i]);
            if let Some(axis) = Unit::try_new(turn, TOLERANCE) {
                let angle = tangents[i - 1].dot(&tangents[i]).clamp(-1.0, 1.0).acos();
                normal = Rotation3::from_axis_angle(&axis, angle) * normal;
            }
            normals.push(normal);
            binormals.push(tangents[i].cross(&normal));
        }

        if self.curve.is_closed() {
            let last = self.segments;
            let mut twist = normals[0].dot(&normals[last]).clamp(-1.0, 1.0).acos() / steps;
            if tangents[0].dot(&normals[0].cross(&normals[last])) > 0.0 {
                twist = -twist;
            }
            for i in 1..=last {
                if let Some(axis) = Unit::try_new(tangents[i], TOLERANCE) {
                    #[allow(clippy::cast_precision_loss)]
                    let angle = twist * i as f64;
                    normals[i] = Rotation3::from_axis_angle(&axis, angle) * normals[i];
                    binormals[i] = tangents[i].cross(&normals[i]);
                }
            }
        }

        Ok(FrameSet {
            tangents,
            normals,
            binormals,
        })
    }
}

/// Returns the world axis the vector has the smallest component along.
fn least_aligned_axis(v: &Vector3) -> Vector3 {
    let (x, y, z) = (v.x.abs(), v.y.abs(), v.z.abs());
    if x <= y && x <= z {
        Vector3::x()
    } else if y <= z {
        Vector3::y()
    } else {
        Vector3::z()
    }
}
