use clap::Parser;
use std::fs;
use std::path::PathBuf;
use anyhow::{Context, Result};
use serde_json::{Map, Value, json};
use tracing_subscriber::{EnvFilter, fmt};
use image_to_palette_wasm::{
    ColorSpace, EngineConfig, Metric, NoopRenderer, PaletteOptions, PaletteRenderer, StatsChart,
    StatsRenderer, SwatchRenderer, extract_palette_from_image,
};

/// Extract dominant color palettes from images with k-means.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Number of clusters (palette size)
    #[arg(short = 'k', long, default_value_t = 8)]
    n_colors: usize,

    /// Stop once no center moves farther than this in one iteration
    #[arg(short = 'm', long, default_value_t = 1.0)]
    min_diff: f64,

    /// Distance between samples
    #[arg(long, value_enum, default_value_t = Metric::Euclidean)]
    metric: Metric,

    /// Color space the pixels are sampled in
    #[arg(long, value_enum, default_value_t = ColorSpace::Rgb)]
    space: ColorSpace,

    /// Seed for the initial centers (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Give up after this many iterations
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Fail instead of returning the last state when --max-iterations is hit
    #[arg(long, requires = "max_iterations")]
    strict: bool,

    /// Downscale the longest side to this many pixels before clustering
    #[arg(short = 's', long)]
    downscale: Option<u32>,

    /// Write a PNG swatch per iteration into this directory
    #[arg(long)]
    swatch_dir: Option<PathBuf>,

    /// Write cluster statistics as JSON to this file
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Prints each chart and keeps it for the JSON report.
#[derive(Default)]
struct ChartCollector {
    charts: Vec<Value>,
}

impl StatsRenderer for ChartCollector {
    fn render(&mut self, chart: &StatsChart) {
        println!("{}", chart.title);
        let mut values = Map::new();
        for (color, value) in &chart.entries {
            println!("  #{color} : {value}");
            values.insert(color.clone(), json!(value));
        }
        self.charts.push(json!({
            "title": chart.title,
            "output": chart.output,
            "values": values,
        }));
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let mut engine = EngineConfig::new(args.n_colors, args.min_diff).strict(args.strict);
    engine.max_iterations = args.max_iterations;
    let options = PaletteOptions {
        engine,
        metric: args.metric,
        space: args.space,
        seed: args.seed,
        downscale: args.downscale,
    };

    let mut report = Vec::new();
    for input in &args.inputs {
        let img = image::open(input).with_context(|| format!("reading {}", input.display()))?;

        let mut swatches: Box<dyn PaletteRenderer> = match &args.swatch_dir {
            Some(dir) => {
                let stem = input.file_stem().unwrap_or_default().to_string_lossy();
                Box::new(SwatchRenderer::new(dir.join(&*stem)))
            }
            None => Box::new(NoopRenderer),
        };
        let mut charts = ChartCollector::default();

        println!("{}", input.display());
        let summary = extract_palette_from_image(img, &options, swatches.as_mut(), &mut charts)
            .with_context(|| format!("palette extraction failed for {}", input.display()))?;

        for stat in &summary.ranked {
            println!(
                "#{} : {} pixels, max distance {:.2}",
                stat.color, stat.count, stat.max_distance
            );
        }

        report.push(json!({
            "input": input.display().to_string(),
            "palette": summary.palette,
            "iterations": summary.iterations,
            "converged": summary.converged,
            "charts": charts.charts,
        }));
    }

    if let Some(path) = &args.stats {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_string_pretty(&report)?;
        fs::write(path, body).with_context(|| format!("writing {}", path.display()))?;
        println!("Saved → {}", path.display());
    }

    Ok(())
}
