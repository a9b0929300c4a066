//! Color samples.

/// One pixel color as a point in a three dimensional color space.
///
/// Samples are never mutated once built; clustering only moves them between
/// member lists.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample([f64; 3]);

impl Sample {
    pub const fn new(coords: [f64; 3]) -> Self {
        Self(coords)
    }

    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        Self([rgb[0] as f64, rgb[1] as f64, rgb[2] as f64])
    }

    #[inline]
    pub fn coords(&self) -> &[f64; 3] {
        &self.0
    }
}

impl From<[f64; 3]> for Sample {
    fn from(coords: [f64; 3]) -> Self {
        Self(coords)
    }
}
