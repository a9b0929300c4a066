//! PNG swatches of the palette at each iteration.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use palette::Srgb;
use tracing::{debug, warn};

use crate::error::{PaletteError, PaletteResult};
use crate::runner::PaletteRenderer;

/// Parse `RRGGBB` or `#RRGGBB`.
pub fn parse_hex(s: &str) -> PaletteResult<Srgb<u8>> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(PaletteError::InvalidColor(format!(
            "hex color must be 6 characters: {s:?}"
        )));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .map_err(|e| PaletteError::InvalidColor(format!("{s:?}: {e}")))
    };
    Ok(Srgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Writes `iteration_NNN.png` into a directory, one square block per color.
#[derive(Clone, Debug)]
pub struct SwatchRenderer {
    dir: PathBuf,
    block: u32,
}

impl SwatchRenderer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            block: 32,
        }
    }

    pub fn with_block_size(mut self, block: u32) -> Self {
        self.block = block.max(1);
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, iteration: usize) -> PathBuf {
        self.dir.join(format!("iteration_{iteration:03}.png"))
    }

    /// Build the swatch strip for `colors`.
    pub fn swatch(&self, colors: &[String]) -> PaletteResult<RgbImage> {
        let parsed = colors
            .iter()
            .map(|c| parse_hex(c))
            .collect::<PaletteResult<Vec<_>>>()?;

        let width = self.block * parsed.len().max(1) as u32;
        let mut img = RgbImage::new(width, self.block);
        for (x, _, px) in img.enumerate_pixels_mut() {
            if let Some(c) = parsed.get((x / self.block) as usize) {
                *px = Rgb([c.red, c.green, c.blue]);
            }
        }
        Ok(img)
    }

    pub fn write(&self, colors: &[String], iteration: usize) -> PaletteResult<PathBuf> {
        std::fs::create_dir_all(&self.dir).map_err(image::ImageError::IoError)?;
        let path = self.path_for(iteration);
        self.swatch(colors)?.save(&path)?;
        Ok(path)
    }
}

impl PaletteRenderer for SwatchRenderer {
    fn render(&mut self, colors: &[String], iteration: usize) {
        match self.write(colors, iteration) {
            Ok(path) => debug!(path = %path.display(), iteration, "wrote palette swatch"),
            Err(e) => warn!(iteration, error = %e, "failed to write palette swatch"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        assert_eq!(parse_hex("#FF0AAB").unwrap(), Srgb::new(255u8, 10, 171));
        assert_eq!(parse_hex("ff0aab").unwrap(), Srgb::new(255u8, 10, 171));
    }

    #[test]
    fn rejects_bad_hex() {
        assert!(matches!(parse_hex("FFF"), Err(PaletteError::InvalidColor(_))));
        assert!(matches!(parse_hex("GG0000"), Err(PaletteError::InvalidColor(_))));
    }

    #[test]
    fn swatch_has_one_block_per_color() {
        let r = SwatchRenderer::new("unused").with_block_size(4);
        let img = r
            .swatch(&["FF0000".to_string(), "0000FF".to_string()])
            .unwrap();
        assert_eq!(img.dimensions(), (8, 4));
        assert_eq!(img.get_pixel(0, 0), &Rgb([255, 0, 0]));
        assert_eq!(img.get_pixel(3, 3), &Rgb([255, 0, 0]));
        assert_eq!(img.get_pixel(4, 0), &Rgb([0, 0, 255]));
    }

    #[test]
    fn writes_numbered_png() {
        let dir = std::env::temp_dir().join(format!("palette-swatch-{}", std::process::id()));
        let r = SwatchRenderer::new(&dir).with_block_size(2);
        let path = r.write(&["123456".to_string()], 7).unwrap();
        assert_eq!(path, dir.join("iteration_007.png"));

        let back = image::open(&path).unwrap().to_rgb8();
        assert_eq!(back.get_pixel(1, 1), &Rgb([0x12, 0x34, 0x56]));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
