//! Error types for palette extraction

use thiserror::Error;

/// Errors that can occur while clustering colors or decoding their source
#[derive(Debug, Error)]
pub enum PaletteError {
    /// Requested cluster count is outside `1..=samples`
    #[error("invalid cluster count: k = {k} with {samples} samples")]
    InvalidClusterCount { k: usize, samples: usize },

    /// Convergence threshold is negative or not a number
    #[error("invalid convergence threshold: {0}")]
    InvalidThreshold(f64),

    /// No samples were supplied
    #[error("empty input: no samples to cluster")]
    EmptyInput,

    /// Strict iteration cap exhausted before the centers settled
    #[error("no convergence after {iterations} iterations (last diff {diff})")]
    NonConvergence { iterations: usize, diff: f64 },

    /// Centroid requested for a cluster with no members
    #[error("cannot compute the centroid of an empty cluster")]
    EmptyCluster,

    /// Malformed display color
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Image decoding error
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for palette operations
pub type PaletteResult<T> = Result<T, PaletteError>;
