use serde::{Deserialize, Serialize};

use crate::tessellation::DrawRange;

/// Default length of the sliding window, as a fraction of the strand.
pub const DEFAULT_WINDOW_LENGTH: f64 = 0.2;

/// How the visible part of a strand follows the animation progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealPolicy {
    /// A segment of bounded length slides forward. Its tail never passes the
    /// strand's stop ratio, so the segment stretches once the tail is pinned.
    SlidingWindow { window_length: f64 },
    /// The strand grows from its start, optionally no further than the stop
    /// ratio.
    GrowFromStart { cap_at_stop: bool },
}

impl Default for RevealPolicy {
    fn default() -> Self {
        Self::SlidingWindow {
            window_length: DEFAULT_WINDOW_LENGTH,
        }
    }
}

impl RevealPolicy {
    /// Returns the `(tail, head)` fractions of a strand for `progress`.
    ///
    /// `stop` of `None` places no limit on the strand.
    #[must_use]
    pub fn span(&self, progress: f64, stop: Option<f64>) -> (f64, f64) {
        let head = progress.clamp(0.0, 1.0);
        let stop = stop.unwrap_or(1.0);
        match *self {
            Self::SlidingWindow { window_length } => {
                let tail = (head - window_length).max(0.0).min(stop);
                (tail, head)
            }
            Self::GrowFromStart { cap_at_stop } => {
                let head = if cap_at_stop { head.min(stop) } else { head };
                (0.0, head)
            }
        }
    }

    /// Maps the span for `progress` onto an index buffer of `total`
    /// indices, aligning both ends down to multiples of `ring_step`.
    #[must_use]
    pub fn range(
        &self,
        progress: f64,
        stop: Option<f64>,
        total: usize,
        ring_step: usize,
    ) -> DrawRange {
        if total == 0 || ring_step == 0 {
            return DrawRange::EMPTY;
        }
        let (tail, head) = self.span(progress, stop);
        let start = align_down(tail, total, ring_step);
        let end = align_down(head, total, ring_step);
        DrawRange::new(start, end.saturating_sub(start))
    }
}

/// `floor(fraction * total / step) * step` for `fraction` in `[0, 1]`.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn align_down(fraction: f64, total: usize, step: usize) -> usize {
    let steps = (fraction * total as f64 / step as f64).floor().max(0.0) as usize;
    (steps * step).min(total / step * step)
}
