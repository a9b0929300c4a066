use wasm_bindgen::prelude::*;
use image::DynamicImage;
use js_sys::{Array, Object, Reflect};
use rand::SeedableRng;
use rand::rngs::StdRng;

pub mod centroid;
pub mod cluster;
pub mod engine;
pub mod error;
pub mod metric;
pub mod render;
pub mod runner;
pub mod sample;
pub mod source;

pub use centroid::{ArithmeticMean, CentroidStrategy};
pub use cluster::{Cluster, ClusterSet};
pub use engine::{ClusteringEngine, EngineConfig, Step};
pub use error::{PaletteError, PaletteResult};
pub use metric::{CylindricalHsv, DistanceMetric, Euclidean, Metric};
pub use render::{SwatchRenderer, parse_hex};
pub use runner::{
    ClusterRunner, ClusterStat, ColorEncoder, HexEncoder, NoopRenderer, PaletteRenderer,
    RunSummary, StatsChart, StatsRenderer,
};
pub use sample::Sample;
pub use source::{ColorSpace, color_counts, downscale, samples_from_counts, samples_from_image};

/// Everything needed to go from an image to a palette.
#[derive(Clone, Debug, PartialEq)]
pub struct PaletteOptions {
    pub engine: EngineConfig,
    pub metric: Metric,
    pub space: ColorSpace,
    /// Seed for choosing the initial centers; OS entropy when `None`.
    pub seed: Option<u64>,
    /// Shrink the longest side to this many pixels before sampling.
    pub downscale: Option<u32>,
}

impl Default for PaletteOptions {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            metric: Metric::Euclidean,
            space: ColorSpace::Rgb,
            seed: None,
            downscale: None,
        }
    }
}

impl PaletteOptions {
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

/// Cluster the colors of `img` and report on the result.
///
/// `palette` sees every intermediate palette, `stats` receives the two
/// statistics charts once the run settles.
pub fn extract_palette_from_image<P, S>(
    img: DynamicImage,
    options: &PaletteOptions,
    palette: &mut P,
    stats: &mut S,
) -> PaletteResult<RunSummary>
where
    P: PaletteRenderer + ?Sized,
    S: StatsRenderer + ?Sized,
{
    let working_img = match options.downscale {
        Some(scale) => downscale(img, scale),
        None => img,
    };
    let samples = samples_from_image(&working_img, options.space);
    tracing::debug!(samples = samples.len(), space = ?options.space, "collected samples");

    let mut rng = options.rng();
    let engine = ClusteringEngine::initialize(
        samples,
        &options.engine,
        options.metric,
        ArithmeticMean,
        &mut rng,
    )?;
    let mut runner = ClusterRunner::new(engine, options.engine.clone(), options.space);
    runner.run(&HexEncoder, palette, stats)
}

/// Decode an encoded image and extract its palette without rendering.
pub fn extract_palette_bytes(input: &[u8], options: &PaletteOptions) -> PaletteResult<RunSummary> {
    let img = image::load_from_memory(input)?;
    extract_palette_from_image(img, options, &mut NoopRenderer, &mut NoopRenderer)
}

/// Extract a `n_colors` palette from an encoded image.
///
/// Returns an object with `palette` (hex strings in cluster order), `counts`,
/// `maxDistances` and `iterations`. With `hsv` set, samples are taken in HSV
/// and compared on the HSV cylinder.
#[wasm_bindgen]
pub fn extract_palette(
    input: Vec<u8>,
    n_colors: usize,
    min_diff: f64,
    seed: Option<u64>,
    hsv: bool,
) -> Result<Object, JsValue> {
    let (metric, space) = if hsv {
        (Metric::Hsv, ColorSpace::Hsv)
    } else {
        (Metric::Euclidean, ColorSpace::Rgb)
    };
    let options = PaletteOptions {
        engine: EngineConfig::new(n_colors, min_diff),
        metric,
        space,
        seed,
        downscale: None,
    };

    let summary = extract_palette_bytes(&input, &options)
        .map_err(|e| JsValue::from_str(&format!("Palette extraction failed: {e}")))?;

    let palette_js = Array::new();
    for hex in &summary.palette {
        palette_js.push(&JsValue::from_str(hex));
    }
    let counts_js = Array::new();
    for &n in &summary.counts {
        counts_js.push(&JsValue::from_f64(n as f64));
    }
    let distances_js = Array::new();
    for &d in &summary.max_distances {
        distances_js.push(&JsValue::from_f64(d));
    }

    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("palette"), &palette_js)?;
    Reflect::set(&result, &JsValue::from_str("counts"), &counts_js)?;
    Reflect::set(&result, &JsValue::from_str("maxDistances"), &distances_js)?;
    Reflect::set(
        &result,
        &JsValue::from_str("iterations"),
        &JsValue::from_f64(summary.iterations as f64),
    )?;

    Ok(result)
}
