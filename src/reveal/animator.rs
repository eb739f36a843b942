use crate::config::AnimationConfig;
use crate::geometry::Strand;
use crate::tessellation::DrawRange;

use super::RevealPolicy;

/// Lifecycle phase of a reveal animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevealPhase {
    /// Meshes are being (re)built; progress is held.
    Building,
    /// Progress advances with time.
    Revealing,
    /// Progress reached 1 and stays there.
    Finished,
}

/// Owns the progress of a reveal and derives each strand's draw range.
///
/// Progress only ever grows and never exceeds 1. A rebuild pauses the
/// animation without resetting it, so a resize does not restart the reveal.
#[derive(Debug, Clone)]
pub struct RevealAnimator {
    progress: f64,
    speed: f64,
    max_frame_delta: f64,
    secondary_delay: f64,
    policy: RevealPolicy,
    stops: [Option<f64>; 2],
    phase: RevealPhase,
}

impl RevealAnimator {
    /// Creates an animator at progress 0, waiting for the first build.
    #[must_use]
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            progress: 0.0,
            speed: config.speed,
            max_frame_delta: config.max_frame_delta,
            secondary_delay: config.secondary_delay,
            policy: config.policy,
            stops: [None; 2],
            phase: RevealPhase::Building,
        }
    }

    /// Returns the progress, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// Returns `true` once progress has reached 1.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == RevealPhase::Finished
    }

    /// Returns the reveal policy.
    #[must_use]
    pub fn policy(&self) -> RevealPolicy {
        self.policy
    }

    /// Returns the stop ratio of `strand`, or `None` when it is unconstrained.
    #[must_use]
    pub fn stop_ratio(&self, strand: Strand) -> Option<f64> {
        self.stops[strand.index()]
    }

    /// Advances progress by `dt` seconds and returns the new progress.
    ///
    /// Only a revealing animation moves. Negative or non-finite deltas count
    /// as zero, and deltas longer than the configured maximum are clamped so
    /// a stalled frame cannot skip the animation ahead.
    pub fn advance(&mut self, dt: f64) -> f64 {
        if self.phase != RevealPhase::Revealing {
            return self.progress;
        }
        let dt = if dt.is_finite() { dt.clamp(0.0, self.max_frame_delta) } else { 0.0 };
        self.progress = (self.progress + dt * self.speed).min(1.0);
        if self.progress >= 1.0 {
            self.phase = RevealPhase::Finished;
            tracing::debug!("reveal finished");
        }
        self.progress
    }

    /// Holds progress while new meshes are built.
    pub fn begin_rebuild(&mut self) {
        if self.phase != RevealPhase::Finished {
            self.phase = RevealPhase::Building;
        }
    }

    /// Installs the stop ratios of the new build and resumes the reveal.
    ///
    /// Ratios of zero, below zero or non-finite mean the stop condition was
    /// never met and are stored as `None`. Larger ratios are clamped to 1.
    pub fn complete_rebuild(&mut self, primary: Option<f64>, secondary: Option<f64>) {
        self.stops = [normalize_stop(primary), normalize_stop(secondary)];
        self.phase = if self.progress >= 1.0 {
            RevealPhase::Finished
        } else {
            RevealPhase::Revealing
        };
        tracing::debug!(
            progress = self.progress,
            primary = ?self.stops[0],
            secondary = ?self.stops[1],
            "reveal resumed after rebuild"
        );
    }

    /// Progress of `strand`, after the secondary strand's start delay.
    #[must_use]
    pub fn strand_progress(&self, strand: Strand) -> f64 {
        match strand {
            Strand::Primary => self.progress,
            Strand::Secondary => {
                ((self.progress - self.secondary_delay) / (1.0 - self.secondary_delay))
                    .clamp(0.0, 1.0)
            }
        }
    }

    /// Returns the draw range of `strand` on a mesh of `total` indices whose
    /// longitudinal segments are `ring_step` indices long.
    #[must_use]
    pub fn range(&self, strand: Strand, total: usize, ring_step: usize) -> DrawRange {
        self.policy.range(
            self.strand_progress(strand),
            self.stop_ratio(strand),
            total,
            ring_step,
        )
    }
}

fn normalize_stop(stop: Option<f64>) -> Option<f64> {
    stop.filter(|ratio| ratio.is_finite() && *ratio > 0.0)
        .map(|ratio| ratio.min(1.0))
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn revealing(config: &AnimationConfig) -> RevealAnimator {
        let mut animator = RevealAnimator::new(config);
        animator.complete_rebuild(None, None);
        animator
    }

    #[test]
    fn starts_building_at_zero() {
        let animator = RevealAnimator::new(&AnimationConfig::default());
        assert_eq!(animator.phase(), RevealPhase::Building);
        assert_eq!(animator.progress(), 0.0);
    }

    #[test]
    fn building_does_not_advance() {
        let mut animator = RevealAnimator::new(&AnimationConfig::default());
        assert_eq!(animator.advance(0.03), 0.0);
    }

    #[test]
    fn dt_spike_is_clamped() {
        let mut animator = revealing(&AnimationConfig::default());
        let progress = animator.advance(5.0);
        assert_relative_eq!(progress, 0.02, epsilon = 1e-12);
    }

    #[test]
    fn negative_and_nan_dt_are_ignored() {
        let mut animator = revealing(&AnimationConfig::default());
        animator.advance(0.01);
        let before = animator.progress();
        assert_eq!(animator.advance(-1.0), before);
        assert_eq!(animator.advance(f64::NAN), before);
        assert_eq!(animator.advance(f64::INFINITY), before);
    }

    #[test]
    fn progress_is_monotonic_and_bounded() {
        let mut animator = revealing(&AnimationConfig::default());
        let mut last = 0.0;
        for frame in 0..400 {
            let dt = [0.016, 0.0, 0.3, -0.2, 0.033][frame % 5];
            let progress = animator.advance(dt);
            assert!(progress >= last);
            assert!(progress <= 1.0);
            last = progress;
        }
        assert_eq!(last, 1.0);
        assert!(animator.is_finished());
        assert_eq!(animator.advance(0.05), 1.0);
    }

    #[test]
    fn rebuild_keeps_progress() {
        let mut animator = revealing(&AnimationConfig::default());
        for _ in 0..10 {
            animator.advance(0.05);
        }
        let before = animator.progress();
        animator.begin_rebuild();
        assert_eq!(animator.phase(), RevealPhase::Building);
        animator.advance(0.05);
        animator.complete_rebuild(Some(0.4), Some(0.4));
        assert_eq!(animator.progress(), before);
        assert_eq!(animator.phase(), RevealPhase::Revealing);
    }

    #[test]
    fn rebuild_after_finish_stays_finished() {
        let config = AnimationConfig {
            speed: 100.0,
            ..AnimationConfig::default()
        };
        let mut animator = revealing(&config);
        animator.advance(0.05);
        assert!(animator.is_finished());
        animator.begin_rebuild();
        animator.complete_rebuild(None, None);
        assert!(animator.is_finished());
    }

    #[test]
    fn zero_stop_means_unconstrained() {
        let mut animator = revealing(&AnimationConfig::default());
        animator.complete_rebuild(Some(0.0), Some(f64::NAN));
        assert_eq!(animator.stop_ratio(Strand::Primary), None);
        assert_eq!(animator.stop_ratio(Strand::Secondary), None);
        animator.complete_rebuild(Some(1.5), Some(0.25));
        assert_eq!(animator.stop_ratio(Strand::Primary), Some(1.0));
        assert_eq!(animator.stop_ratio(Strand::Secondary), Some(0.25));
    }

    #[test]
    fn ranges_stay_valid_through_the_reveal() {
        let mut animator = revealing(&AnimationConfig::default());
        animator.complete_rebuild(Some(0.3), Some(0.6));
        let (total, step) = (21_600, 72);
        while !animator.is_finished() {
            animator.advance(0.016);
            for strand in Strand::ALL {
                let range = animator.range(strand, total, step);
                assert!(range.end() <= total);
                assert_eq!(range.start % step, 0);
                assert_eq!(range.count % step, 0);
                #[allow(clippy::cast_precision_loss)]
                let tail = range.start as f64 / total as f64;
                assert!(tail <= animator.stop_ratio(strand).unwrap_or(1.0) + 1e-12);
            }
        }
    }

    #[test]
    fn secondary_delay_holds_back_second_strand() {
        let config = AnimationConfig {
            secondary_delay: 0.5,
            ..AnimationConfig::default()
        };
        let mut animator = revealing(&config);
        for _ in 0..25 {
            animator.advance(0.05);
        }
        assert_relative_eq!(animator.progress(), 0.5, epsilon = 1e-9);
        assert_relative_eq!(animator.strand_progress(Strand::Secondary), 0.0, epsilon = 1e-9);
        assert_eq!(animator.range(Strand::Secondary, 720, 72), DrawRange::EMPTY);

        while !animator.is_finished() {
            animator.advance(0.05);
        }
        assert_eq!(animator.strand_progress(Strand::Secondary), 1.0);
    }
}
