//! Shared tube material.
//!
//! Every engine draws its tubes with the same material. The cache only keeps
//! a weak reference, so the material lives exactly as long as the last
//! [`MaterialHandle`] and is recreated on the next acquire.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

/// Appearance values handed to the renderer unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialParams {
    /// Base and emissive color as `0xRRGGBB`.
    pub color: u32,
    pub emissive_intensity: f64,
    pub shininess: f64,
}

impl Default for MaterialParams {
    fn default() -> Self {
        Self {
            color: 0x00ff88,
            emissive_intensity: 0.2,
            shininess: 100.0,
        }
    }
}

#[derive(Debug)]
struct Material {
    id: u64,
    params: MaterialParams,
}

impl Drop for Material {
    fn drop(&mut self) {
        tracing::debug!(id = self.id, "material released");
    }
}

/// A counted reference to the shared material.
#[derive(Debug, Clone)]
pub struct MaterialHandle {
    material: Rc<Material>,
}

impl MaterialHandle {
    /// Returns the material parameters.
    #[must_use]
    pub fn params(&self) -> &MaterialParams {
        &self.material.params
    }

    /// Identifies the material instance. A material recreated after release
    /// gets a new id.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.material.id
    }

    /// Returns `true` if both handles refer to the same material instance.
    #[must_use]
    pub fn same_material(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.material, &other.material)
    }

    /// Number of live handles to this material.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.material)
    }
}

/// Hands out handles to a single shared material.
#[derive(Debug, Default)]
pub struct MaterialCache {
    material: RefCell<Weak<Material>>,
    next_id: Cell<u64>,
}

impl MaterialCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle to the live material, creating it from `params` if
    /// none is alive.
    ///
    /// While a material is alive, later `params` are ignored.
    pub fn acquire(&self, params: &MaterialParams) -> MaterialHandle {
        if let Some(material) = self.material.borrow().upgrade() {
            if material.params != *params {
                tracing::debug!(id = material.id, "material already live, ignoring new params");
            }
            return MaterialHandle { material };
        }

        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let material = Rc::new(Material {
            id,
            params: *params,
        });
        *self.material.borrow_mut() = Rc::downgrade(&material);
        tracing::debug!(id, "material created");
        MaterialHandle { material }
    }

    /// Returns `true` while some handle keeps the material alive.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.material.borrow().strong_count() > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_share_one_material() {
        let cache = MaterialCache::new();
        let a = cache.acquire(&MaterialParams::default());
        let b = cache.acquire(&MaterialParams::default());
        assert!(a.same_material(&b));
        assert_eq!(a.handle_count(), 2);
    }

    #[test]
    fn last_drop_releases_material() {
        let cache = MaterialCache::new();
        let a = cache.acquire(&MaterialParams::default());
        let b = a.clone();
        drop(a);
        assert!(cache.is_live());
        drop(b);
        assert!(!cache.is_live());
    }

    #[test]
    fn reacquire_after_release_creates_new_material() {
        let cache = MaterialCache::new();
        let first = cache.acquire(&MaterialParams::default()).id();
        let second = cache.acquire(&MaterialParams::default()).id();
        assert_ne!(first, second);
    }

    #[test]
    fn live_material_keeps_its_params() {
        let cache = MaterialCache::new();
        let a = cache.acquire(&MaterialParams::default());
        let b = cache.acquire(&MaterialParams {
            color: 0xff0000,
            ..MaterialParams::default()
        });
        assert_eq!(b.params().color, 0x00ff88);
        assert!(a.same_material(&b));
    }
}
