mod frames;
mod mesh_store;
mod tessellate_tube;
mod tube_style;

pub use frames::{FrameSet, TransportFrames};
pub use mesh_store::{MeshId, MeshStore};
pub use tessellate_tube::{TessellateTube, TubeMesh};
pub use tube_style::{max_tubular_segments, TubeStyle};

use serde::{Deserialize, Serialize};

use crate::math::{Point2, Point3, Vector3};

/// A triangle mesh approximation of a surface.
#[derive(Debug, Clone, Default)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3>,
    /// Vertex normals.
    pub normals: Vec<Vector3>,
    /// UV coordinates.
    pub uvs: Vec<Point2>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Returns the number of scalar indices (three per triangle).
    #[must_use]
    pub fn index_count(&self) -> usize {
        self.indices.len() * 3
    }

    /// Iterates over the flat index buffer.
    pub fn flat_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.indices.iter().flatten().copied()
    }
}

/// A contiguous sub-range of a mesh's flat index buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DrawRange {
    /// First index drawn.
    pub start: usize,
    /// Number of indices drawn.
    pub count: usize,
}

impl DrawRange {
    /// The empty range.
    pub const EMPTY: Self = Self { start: 0, count: 0 };

    /// Creates a new range.
    #[must_use]
    pub fn new(start: usize, count: usize) -> Self {
        Self { start, count }
    }

    /// One past the last index drawn.
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.count
    }

    /// Returns `true` if nothing is drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Clamps the range to a buffer of `total` indices.
    #[must_use]
    pub fn clamped(self, total: usize) -> Self {
        let start = self.start.min(total);
        let count = self.count.min(total - start);
        Self { start, count }
    }
}
