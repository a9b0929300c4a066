//! Distance metrics between color samples.

use crate::sample::Sample;

/// Dissimilarity between two samples.
///
/// Implementations must be symmetric, non-negative and return zero for
/// identical samples.
pub trait DistanceMetric {
    fn distance(&self, p: &Sample, q: &Sample) -> f64;
}

/// Plain L2 norm over all coordinates, unnormalized.
#[derive(Clone, Copy, Debug, Default)]
pub struct Euclidean;

impl DistanceMetric for Euclidean {
    #[inline]
    fn distance(&self, p: &Sample, q: &Sample) -> f64 {
        p.coords()
            .iter()
            .zip(q.coords())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }
}

/// Distance on the HSV cylinder.
///
/// Coordinates are `(hue in degrees, saturation, value in 0..=255)`. Hue wraps
/// around the circle and is scaled by 180, value is scaled by 255 and
/// saturation is taken as-is.
#[derive(Clone, Copy, Debug, Default)]
pub struct CylindricalHsv;

impl DistanceMetric for CylindricalHsv {
    fn distance(&self, p: &Sample, q: &Sample) -> f64 {
        let [h1, s1, v1] = *p.coords();
        let [h2, s2, v2] = *q.coords();

        let gap = (h2 - h1).abs();
        let dh = gap.min(360.0 - gap) / 180.0;
        let ds = (s2 - s1).abs();
        let dv = (v2 - v1).abs() / 255.0;

        (dh * dh + ds * ds + dv * dv).sqrt()
    }
}

/// Runtime selection between the available metrics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "native-bin", derive(clap::ValueEnum))]
pub enum Metric {
    #[default]
    Euclidean,
    Hsv,
}

impl DistanceMetric for Metric {
    #[inline]
    fn distance(&self, p: &Sample, q: &Sample) -> f64 {
        match self {
            Metric::Euclidean => Euclidean.distance(p, q),
            Metric::Hsv => CylindricalHsv.distance(p, q),
        }
    }
}
