//! Centroid strategies.

use crate::error::{PaletteError, PaletteResult};
use crate::sample::Sample;

/// Computes the representative sample of a set of members.
pub trait CentroidStrategy {
    /// Fails with [`PaletteError::EmptyCluster`] when `members` is empty.
    fn centroid(&self, members: &[Sample]) -> PaletteResult<Sample>;
}

/// Per-coordinate arithmetic mean, unweighted over entries.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArithmeticMean;

impl CentroidStrategy for ArithmeticMean {
    fn centroid(&self, members: &[Sample]) -> PaletteResult<Sample> {
        if members.is_empty() {
            return Err(PaletteError::EmptyCluster);
        }

        let mut sums = [0.0f64; 3];
        for m in members {
            for (acc, v) in sums.iter_mut().zip(m.coords()) {
                *acc += v;
            }
        }

        let n = members.len() as f64;
        Ok(Sample::new(sums.map(|v| v / n)))
    }
}
