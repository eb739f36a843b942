use crate::config::{EngineConfig, StopRatioMode};
use crate::error::Result;
use crate::geometry::{Strand, TrackPaths};
use crate::material::MaterialHandle;
use crate::operations::creation::MakeTrack;
use crate::operations::query::{StopPredicate, StopRatio};
use crate::reveal::{RevealAnimator, RevealPhase};
use crate::tessellation::{DrawRange, MeshId, MeshStore, TessellateTube, TubeMesh, TubeStyle};
use crate::viewport::{ViewportAdapter, ViewportResolution};

use super::FrameRanges;

/// Everything produced by one track build, before it is swapped in.
struct Build {
    paths: TrackPaths,
    meshes: [Option<TubeMesh>; 2],
    stops: [Option<f64>; 2],
}

/// Drives one animated track from construction to disposal.
///
/// The engine owns the track curves, the tube meshes and the reveal state.
/// A host calls [`TrackEngine::advance`] once per frame and
/// [`TrackEngine::resize`] whenever its surface changes; a resize rebuilds
/// the track for the new viewport without restarting the reveal.
#[derive(Debug)]
pub struct TrackEngine {
    config: EngineConfig,
    viewport: ViewportAdapter,
    animator: RevealAnimator,
    store: MeshStore,
    meshes: [Option<MeshId>; 2],
    paths: Option<TrackPaths>,
    ranges: FrameRanges,
    material: Option<MaterialHandle>,
    disposed: bool,
}

impl TrackEngine {
    /// Validates `config`, fits the track to a `width` x `height` viewport
    /// and builds its meshes.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the viewport is not
    /// finite or is negative, or the track cannot be built.
    pub fn new(
        config: EngineConfig,
        material: MaterialHandle,
        width: f64,
        height: f64,
    ) -> Result<Self> {
        config.validate()?;
        let viewport = ViewportAdapter::new(config.camera.clone(), config.breakpoints.clone());
        let resolution = viewport.resolve(width, height)?;

        let mut engine = Self {
            animator: RevealAnimator::new(&config.animation),
            config,
            viewport,
            store: MeshStore::new(),
            meshes: [None; 2],
            paths: None,
            ranges: FrameRanges::default(),
            material: Some(material),
            disposed: false,
        };
        engine.rebuild(&resolution)?;
        engine.viewport.commit(width, height, resolution);
        Ok(engine)
    }

    /// Advances the reveal by `dt` seconds and applies the new draw ranges.
    ///
    /// Returns the ranges applied this frame; empty after disposal.
    pub fn advance(&mut self, dt: f64) -> FrameRanges {
        if self.disposed {
            return FrameRanges::default();
        }
        self.animator.advance(dt);
        self.apply_ranges();
        tracing::trace!(progress = self.animator.progress(), "frame");
        self.ranges
    }

    /// Records a new viewport size and rebuilds the track if it changed.
    ///
    /// Returns whether a rebuild happened. The rebuild completes before this
    /// returns, so the next frame only sees the new meshes. Does nothing
    /// after disposal.
    ///
    /// # Errors
    ///
    /// Returns an error if the viewport is not finite, is negative, or the
    /// new track cannot be built. The previous track and its viewport stay
    /// in place on error, so a retry at the same size rebuilds again.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<bool> {
        if self.disposed {
            return Ok(false);
        }
        match self.viewport.changed(width, height)? {
            Some(resolution) => {
                self.rebuild(&resolution)?;
                self.viewport.commit(width, height, resolution);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Releases the meshes and the material handle. Calling it again does
    /// nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        let released = self.store.clear();
        self.meshes = [None; 2];
        self.paths = None;
        self.ranges = FrameRanges::default();
        self.material = None;
        self.disposed = true;
        tracing::debug!(released, "track engine disposed");
    }

    /// Returns the reveal progress, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.animator.progress()
    }

    /// Returns the reveal phase.
    #[must_use]
    pub fn phase(&self) -> RevealPhase {
        self.animator.phase()
    }

    /// Returns `true` once the reveal has completed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.animator.is_finished()
    }

    /// Returns `true` after [`TrackEngine::dispose`].
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Returns the engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the curves of the current build.
    #[must_use]
    pub fn paths(&self) -> Option<&TrackPaths> {
        self.paths.as_ref()
    }

    /// Returns the id of `strand`'s mesh in the engine's store.
    #[must_use]
    pub fn mesh_id(&self, strand: Strand) -> Option<MeshId> {
        self.meshes[strand.index()]
    }

    /// Returns the tube mesh of `strand`.
    #[must_use]
    pub fn mesh(&self, strand: Strand) -> Option<&TubeMesh> {
        self.mesh_id(strand).and_then(|id| self.store.mesh(id).ok())
    }

    /// Returns the meshes owned by the engine.
    #[must_use]
    pub fn store(&self) -> &MeshStore {
        &self.store
    }

    /// Returns the range last applied to `strand`'s mesh.
    #[must_use]
    pub fn draw_range(&self, strand: Strand) -> Option<DrawRange> {
        self.ranges.get(strand)
    }

    /// Returns the stop ratio of `strand`, or `None` when it is unconstrained.
    #[must_use]
    pub fn stop_ratio(&self, strand: Strand) -> Option<f64> {
        self.animator.stop_ratio(strand)
    }

    /// Returns the resolution the current track was built for.
    #[must_use]
    pub fn resolution(&self) -> Option<&ViewportResolution> {
        self.viewport.current()
    }

    /// Returns the material handle, until disposal.
    #[must_use]
    pub fn material(&self) -> Option<&MaterialHandle> {
        self.material.as_ref()
    }

    /// Rebuilds the track for `resolution` and swaps it in.
    ///
    /// Progress is held while building. New meshes are stored before the old
    /// ones are released, so a strand never lacks a mesh mid-swap. On error
    /// the reveal resumes on the existing track.
    fn rebuild(&mut self, resolution: &ViewportResolution) -> Result<()> {
        self.animator.begin_rebuild();
        let build = match self.build(resolution) {
            Ok(build) => build,
            Err(err) => {
                self.animator.complete_rebuild(
                    self.animator.stop_ratio(Strand::Primary),
                    self.animator.stop_ratio(Strand::Secondary),
                );
                return Err(err);
            }
        };

        let Build {
            paths,
            meshes,
            stops,
        } = build;
        for (strand, mesh) in Strand::ALL.into_iter().zip(meshes) {
            let new_id = mesh.map(|mesh| self.store.insert(mesh));
            let old_id = std::mem::replace(&mut self.meshes[strand.index()], new_id);
            if let Some(old_id) = old_id {
                self.store.release(old_id);
            }
        }
        tracing::debug!(
            tier = ?resolution.tier,
            orientation = ?paths.orientation,
            turn_point = paths.turn_point,
            meshes = self.store.len(),
            "track rebuilt"
        );
        self.paths = Some(paths);

        self.animator.complete_rebuild(stops[0], stops[1]);
        self.ranges = FrameRanges::default();
        self.apply_ranges();
        Ok(())
    }

    fn build(&self, resolution: &ViewportResolution) -> Result<Build> {
        let geometry = &self.config.geometry;
        let animation = &self.config.animation;
        let paths =
            MakeTrack::new(resolution.visible, geometry, resolution.orientation).execute()?;
        let style = TubeStyle::from_geometry(geometry)?;

        let mut meshes = [None, None];
        let mut stops = [None, None];
        for (strand, curve) in paths.strands() {
            meshes[strand.index()] = Some(TessellateTube::new(curve, style).execute()?);

            let mirrored = strand == Strand::Secondary
                && animation.stop_ratio_mode == StopRatioMode::Mirrored;
            stops[strand.index()] = if mirrored {
                stops[Strand::Primary.index()]
            } else {
                let (axis, threshold) = paths.stop_threshold(strand);
                let ratio = StopRatio::new(curve, StopPredicate::crossing(axis, threshold))
                    .with_samples(animation.stop_samples)
                    .execute()?;
                Some(ratio)
            };
        }

        Ok(Build {
            paths,
            meshes,
            stops,
        })
    }

    /// Applies the animator's ranges to every live mesh.
    fn apply_ranges(&mut self) {
        for strand in Strand::ALL {
            let Some(id) = self.meshes[strand.index()] else {
                continue;
            };
            if let Ok(mesh) = self.store.mesh_mut(id) {
                let range = self
                    .animator
                    .range(strand, mesh.index_count(), mesh.ring_step());
                let applied = mesh.set_visible_range(range.start, range.count);
                self.ranges.set(strand, applied);
            }
        }
    }
}
