use crate::geometry::Strand;
use crate::tessellation::DrawRange;

/// Draw ranges applied to each strand's mesh in one frame.
///
/// A strand without a mesh has no range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameRanges {
    ranges: [Option<DrawRange>; 2],
}

impl FrameRanges {
    /// Returns the range applied to `strand`.
    #[must_use]
    pub fn get(&self, strand: Strand) -> Option<DrawRange> {
        self.ranges[strand.index()]
    }

    pub(crate) fn set(&mut self, strand: Strand, range: DrawRange) {
        self.ranges[strand.index()] = Some(range);
    }

    /// Returns `true` if no strand was drawn.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.iter().all(Option::is_none)
    }

    /// Iterates over the strands that have a range.
    pub fn iter(&self) -> impl Iterator<Item = (Strand, DrawRange)> + '_ {
        Strand::ALL
            .into_iter()
            .filter_map(|strand| self.get(strand).map(|range| (strand, range)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty() {
        let ranges = FrameRanges::default();
        assert!(ranges.is_empty());
        assert_eq!(ranges.iter().count(), 0);
    }

    #[test]
    fn set_and_iterate() {
        let mut ranges = FrameRanges::default();
        ranges.set(Strand::Secondary, DrawRange::new(72, 144));
        assert_eq!(ranges.get(Strand::Primary), None);
        assert_eq!(ranges.get(Strand::Secondary), Some(DrawRange::new(72, 144)));
        assert_eq!(
            ranges.iter().collect::<Vec<_>>(),
            vec![(Strand::Secondary, DrawRange::new(72, 144))]
        );
    }
}
