use slotmap::SlotMap;

use crate::error::MeshError;

use super::TubeMesh;

slotmap::new_key_type! {
    /// Unique identifier for a mesh in the mesh store.
    pub struct MeshId;
}

/// Arena that owns every live tube mesh.
///
/// Meshes are addressed by generational ids, so an id whose mesh has been
/// released never aliases a mesh inserted later. Releasing an id twice is a
/// no-op.
#[derive(Debug, Default)]
pub struct MeshStore {
    meshes: SlotMap<MeshId, TubeMesh>,
}

impl MeshStore {
    /// Creates a new, empty mesh store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes ownership of a mesh and returns its ID.
    pub fn insert(&mut self, mesh: TubeMesh) -> MeshId {
        self.meshes.insert(mesh)
    }

    /// Returns a reference to the mesh, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh has been released.
    pub fn mesh(&self, id: MeshId) -> Result<&TubeMesh, MeshError> {
        self.meshes
            .get(id)
            .ok_or_else(|| MeshError::NotFound(format!("{id:?}")))
    }

    /// Returns a mutable reference to the mesh, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the mesh has been released.
    pub fn mesh_mut(&mut self, id: MeshId) -> Result<&mut TubeMesh, MeshError> {
        self.meshes
            .get_mut(id)
            .ok_or_else(|| MeshError::NotFound(format!("{id:?}")))
    }

    /// Returns `true` if `id` refers to a live mesh.
    #[must_use]
    pub fn contains(&self, id: MeshId) -> bool {
        self.meshes.contains_key(id)
    }

    /// Releases a mesh, returning it if it was still live.
    pub fn release(&mut self, id: MeshId) -> Option<TubeMesh> {
        self.meshes.remove(id)
    }

    /// Releases every mesh and returns how many were live.
    pub fn clear(&mut self) -> usize {
        let released = self.meshes.len();
        self.meshes.clear();
        released
    }

    /// Returns the number of live meshes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Returns `true` if no mesh is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}
