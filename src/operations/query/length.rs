use crate::error::Result;
use crate::geometry::curve::{ArcLengthTable, Curve, DEFAULT_DIVISIONS};

/// Computes the length of a curve by chord sampling.
pub struct Length<'a, C: Curve + ?Sized> {
    curve: &'a C,
    divisions: usize,
}

impl<'a, C: Curve + ?Sized> Length<'a, C> {
    /// Creates a new `Length` query with the default resolution.
    #[must_use]
    pub fn new(curve: &'a C) -> Self {
        Self {
            curve,
            divisions: DEFAULT_DIVISIONS,
        }
    }

    /// Sets the number of parameter steps to sample.
    #[must_use]
    pub fn with_divisions(mut self, divisions: usize) -> Self {
        self.divisions = divisions;
        self
    }

    /// Executes the query, returning the curve length.
    ///
    /// The result approaches the true length from below as the number of
    /// divisions grows.
    ///
    /// # Errors
    ///
    /// Returns an error if `divisions` is zero or the curve fails to evaluate.
    pub fn execute(&self) -> Result<f64> {
        Ok(ArcLengthTable::new(self.curve, self.divisions)?.total())
    }
}
