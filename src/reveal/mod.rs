//! Progressive reveal of tube meshes.
//!
//! A [`RevealAnimator`] turns elapsed time into a progress value and maps it,
//! through a [`RevealPolicy`], onto the index buffer of each strand's mesh.

mod animator;
mod policy;

pub use animator::{RevealAnimator, RevealPhase};
pub use policy::RevealPolicy;
