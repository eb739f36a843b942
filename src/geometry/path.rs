use serde::{Deserialize, Serialize};

use crate::geometry::curve::CatmullRom;
use crate::math::Axis;
use crate::operations::transform::Orientation;

/// One of the two coupled paths of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strand {
    /// The strand entering from the positive end of the track.
    Primary,
    /// The mirrored strand running in opposite phase.
    Secondary,
}

impl Strand {
    /// Both strands, primary first.
    pub const ALL: [Strand; 2] = [Strand::Primary, Strand::Secondary];

    /// Position of this strand in [`Strand::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Primary => 0,
            Self::Secondary => 1,
        }
    }

    /// Returns the name of this strand.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
        }
    }
}

/// The curves of one track build together with the measurements they were
/// derived from.
#[derive(Debug, Clone)]
pub struct TrackPaths {
    /// The primary strand.
    pub primary: CatmullRom,
    /// The mirrored strand, present in the dual-strand layout.
    pub secondary: Option<CatmullRom>,
    /// Distance from the track center to where a straight ends and a turn begins.
    pub turn_point: f64,
    /// Radius of the semicircular turns.
    pub turn_radius: f64,
    /// Visible extent along the straights that the track was fitted to.
    pub extent: f64,
    /// Orientation the local track frame was mapped through.
    pub orientation: Orientation,
}

impl TrackPaths {
    /// Returns the curve for `strand`, if that strand was built.
    #[must_use]
    pub fn curve(&self, strand: Strand) -> Option<&CatmullRom> {
        match strand {
            Strand::Primary => Some(&self.primary),
            Strand::Secondary => self.secondary.as_ref(),
        }
    }

    /// Iterates over the strands that were built.
    pub fn strands(&self) -> impl Iterator<Item = (Strand, &CatmullRom)> {
        Strand::ALL
            .into_iter()
            .filter_map(|strand| self.curve(strand).map(|curve| (strand, curve)))
    }

    /// Returns the world axis and coordinate at which `strand` leaves its
    /// first straight and meets the turn of the other strand.
    #[must_use]
    pub fn stop_threshold(&self, strand: Strand) -> (Axis, f64) {
        let axis = self.orientation.along_axis();
        match strand {
            Strand::Primary => (axis, self.turn_point),
            Strand::Secondary => (axis, -self.turn_point),
        }
    }
}
