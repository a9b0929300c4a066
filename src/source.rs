//! Turning decoded images into clustering samples.

use std::collections::BTreeMap;

use image::{DynamicImage, GenericImageView, imageops::FilterType};
use palette::{FromColor, Hsv, Srgb};

use crate::sample::Sample;

type SrgbHsv = Hsv<palette::encoding::Srgb, f64>;

/// Color space the samples are expressed in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "native-bin", derive(clap::ValueEnum))]
pub enum ColorSpace {
    /// `(r, g, b)`, each in 0..=255.
    #[default]
    Rgb,
    /// `(hue degrees, saturation 0..=1, value 0..=255)`.
    Hsv,
}

impl ColorSpace {
    pub fn sample(self, rgb: [u8; 3]) -> Sample {
        match self {
            ColorSpace::Rgb => Sample::from_rgb(rgb),
            ColorSpace::Hsv => {
                let srgb = Srgb::<u8>::new(rgb[0], rgb[1], rgb[2]).into_format::<f64>();
                let hsv = SrgbHsv::from_color(srgb);
                Sample::new([
                    hsv.hue.into_positive_degrees(),
                    hsv.saturation,
                    hsv.value * 255.0,
                ])
            }
        }
    }

    /// Integer RGB for display, truncating each channel.
    pub fn to_display(self, sample: &Sample) -> [u8; 3] {
        let [a, b, c] = *sample.coords();
        match self {
            ColorSpace::Rgb => [truncate(a), truncate(b), truncate(c)],
            ColorSpace::Hsv => {
                let hsv = SrgbHsv::new(a, b.clamp(0.0, 1.0), (c / 255.0).clamp(0.0, 1.0));
                let rgb = Srgb::<f64>::from_color(hsv);
                [
                    truncate(rgb.red * 255.0),
                    truncate(rgb.green * 255.0),
                    truncate(rgb.blue * 255.0),
                ]
            }
        }
    }
}

#[inline]
fn truncate(v: f64) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

/// Expand `(count, color)` pairs into one sample per occurrence.
pub fn samples_from_counts(counts: &[(usize, [u8; 3])], space: ColorSpace) -> Vec<Sample> {
    let total = counts.iter().map(|(n, _)| n).sum();
    let mut samples = Vec::with_capacity(total);
    for &(n, rgb) in counts {
        let s = space.sample(rgb);
        samples.extend(std::iter::repeat_n(s, n));
    }
    samples
}

/// Count the opaque colors of an image, ascending by color.
///
/// Fully transparent pixels (alpha = 0) are skipped.
pub fn color_counts(img: &DynamicImage) -> Vec<(usize, [u8; 3])> {
    let mut counts: BTreeMap<[u8; 3], usize> = BTreeMap::new();
    for px in img.to_rgba8().pixels() {
        let [r, g, b, a] = px.0;
        if a == 0 {
            continue;
        }
        *counts.entry([r, g, b]).or_default() += 1;
    }
    counts.into_iter().map(|(rgb, n)| (n, rgb)).collect()
}

/// Every opaque pixel of `img` as a sample in `space`.
pub fn samples_from_image(img: &DynamicImage, space: ColorSpace) -> Vec<Sample> {
    samples_from_counts(&color_counts(img), space)
}

/// Shrink `img` so its longest side equals `scale`, keeping the aspect ratio.
///
/// Images already within `scale` are returned unchanged.
pub fn downscale(img: DynamicImage, scale: u32) -> DynamicImage {
    let (orig_w, orig_h) = img.dimensions();
    let max_side = orig_w.max(orig_h);
    if scale == 0 || max_side <= scale {
        return img;
    }
    let ratio = scale as f32 / max_side as f32;
    let w = ((orig_w as f32) * ratio).round().max(1.0) as u32;
    let h = ((orig_h as f32) * ratio).round().max(1.0) as u32;
    DynamicImage::ImageRgba8(image::imageops::resize(&img, w, h, FilterType::Nearest))
}
